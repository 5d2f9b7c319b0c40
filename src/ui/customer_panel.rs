//! Customer management panel with CRUD and fuzzy search.

use std::time::Instant;

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, CustomerDialog, DeleteTarget};
use super::components::{
    action_button, back_button, danger_action_button, form_row, form_row_multiline, panel_header,
    primary_button_with_icon, search_box, styled_button, styled_button_with_icon,
};
use crate::quote::can_manage_catalog;

/// Show the customer panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Customers");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Customer").clicked() && app.customers.editing().is_none() {
            app.customer_dialog = CustomerDialog::create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_customers();
        }

        ui.add_space(20.0);

        if search_box(ui, &mut app.customers.query, "Customer name...") {
            app.customers.query_changed(Instant::now());
        }
        if !app.customers.query.is_empty() && styled_button(ui, "Clear").clicked() {
            app.customers.clear_search();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.customer_dialog.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let manage = app.ctx.user().is_some_and(|u| can_manage_catalog(u.sales_p_type));
    let visible: Vec<_> = app.customers.visible().into_iter().cloned().collect();

    ui.label(format!(
        "Showing {} of {} customers",
        visible.len(),
        app.customers.items().len()
    ));
    if app.customers.is_loading() {
        ui.spinner();
    }

    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("customer_scroll").show(ui, |ui| {
        egui::Grid::new("customers_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Address");
                ui.strong("VAT No");
                ui.strong("Contact Person");
                ui.strong("Contact No");
                ui.strong("Actions");
                ui.end_row();

                for customer in &visible {
                    ui.label(&customer.cus_code);
                    ui.label(&customer.cus_name);
                    ui.label(&customer.cus_addr);
                    ui.label(&customer.cus_vat_no);
                    ui.label(&customer.contact_person);
                    ui.label(&customer.contact_p_no);

                    ui.horizontal(|ui| {
                        if !manage {
                            ui.weak("-");
                            return;
                        }
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.begin_customer_edit(customer);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.confirm_delete(DeleteTarget::Customer {
                                id: customer.cus_id,
                                code: customer.cus_code.clone(),
                                name: customer.cus_name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.customer_dialog.is_editing() {
        "Edit Customer"
    } else {
        "Add Customer"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(450.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let dialog = &mut app.customer_dialog;
            egui::Grid::new("customer_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    if let Some(base) = &dialog.base {
                        ui.label("Code:");
                        ui.label(&base.cus_code);
                        ui.end_row();
                    }
                    form_row(ui, "Customer Name:", &mut dialog.info.customer_name, &dialog.errors, "customer_name");
                    form_row_multiline(
                        ui,
                        "Address:",
                        &mut dialog.info.customer_address,
                        &dialog.errors,
                        "customer_address",
                    );
                    form_row(ui, "VAT No:", &mut dialog.info.vat_no, &dialog.errors, "vat_no");
                    form_row(ui, "Contact Person:", &mut dialog.info.contact_person, &dialog.errors, "contact_person");
                    form_row(
                        ui,
                        "Contact Number:",
                        &mut dialog.info.contact_person_number,
                        &dialog.errors,
                        "contact_person_number",
                    );
                    form_row_multiline(
                        ui,
                        "Details:",
                        &mut dialog.info.customer_details,
                        &dialog.errors,
                        "customer_details",
                    );
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.cancel_customer_dialog();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!app.customer_dialog.saving, |ui| {
                        if primary_button_with_icon(ui, "", "Save").clicked() {
                            app.save_customer();
                        }
                    });
                    if app.customer_dialog.saving {
                        ui.spinner();
                    }
                });
            });
        });
}
