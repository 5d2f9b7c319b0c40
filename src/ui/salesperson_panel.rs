//! Sales person management panel.

use std::time::Instant;

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget, SalesPersonDialog};
use super::components::{
    action_button, back_button, danger_action_button, field_error, form_row, panel_header, primary_button_with_icon,
    search_box, styled_button, styled_button_with_icon,
};
use crate::models::SalesPersonType;
use crate::quote::can_manage_catalog;

/// Show the sales person panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Sales Persons");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Sales Person").clicked() && app.salespersons.editing().is_none() {
            app.salesperson_dialog = SalesPersonDialog::create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_salespersons();
        }

        ui.add_space(20.0);

        if search_box(ui, &mut app.salespersons.query, "Code, name, email...") {
            app.salespersons.query_changed(Instant::now());
        }
        if !app.salespersons.query.is_empty() && styled_button(ui, "Clear").clicked() {
            app.salespersons.clear_search();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.salesperson_dialog.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let manage = app.ctx.user().is_some_and(|u| can_manage_catalog(u.sales_p_type));
    let visible: Vec<_> = app.salespersons.visible().into_iter().cloned().collect();

    ui.label(format!(
        "Showing {} of {} sales persons",
        visible.len(),
        app.salespersons.items().len()
    ));
    if app.salespersons.is_loading() {
        ui.spinner();
    }

    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("salesperson_scroll").show(ui, |ui| {
        egui::Grid::new("salespersons_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Email");
                ui.strong("Contact No");
                ui.strong("Designation");
                ui.strong("Type");
                ui.strong("Actions");
                ui.end_row();

                for sp in &visible {
                    ui.label(&sp.sales_p_code);
                    ui.label(&sp.sales_p_name);
                    ui.label(&sp.sales_p_email);
                    ui.label(&sp.sales_p_contact_no);
                    ui.label(&sp.sales_p_designation);
                    ui.label(sp.sales_p_type.label());

                    ui.horizontal(|ui| {
                        if !manage {
                            ui.weak("-");
                            return;
                        }
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.begin_salesperson_edit(sp);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.confirm_delete(DeleteTarget::SalesPerson {
                                code: sp.sales_p_code.clone(),
                                name: sp.sales_p_name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.salesperson_dialog.is_editing() {
        "Edit Sales Person"
    } else {
        "Add Sales Person"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(450.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let dialog = &mut app.salesperson_dialog;
            egui::Grid::new("salesperson_form_grid")
                .num_columns(2)
                .spacing([20.0, 10.0])
                .show(ui, |ui| {
                    if let Some(code) = &dialog.code {
                        ui.label("Code:");
                        ui.label(code);
                        ui.end_row();
                    }
                    let form = &mut dialog.form;
                    let errors = &dialog.errors;
                    form_row(ui, "Name:", &mut form.sales_p_name, errors, "sales_p_name");
                    form_row(ui, "Email:", &mut form.sales_p_email, errors, "sales_p_email");
                    form_row(ui, "Contact Number:", &mut form.sales_p_contact_no, errors, "sales_p_contact_no");
                    form_row(ui, "Designation:", &mut form.sales_p_designation, errors, "sales_p_designation");

                    ui.label("Type:");
                    ui.vertical(|ui| {
                        egui::ComboBox::from_id_salt("salesperson_type")
                            .width(200.0)
                            .selected_text(form.sales_p_type.map(SalesPersonType::label).unwrap_or("Select..."))
                            .show_ui(ui, |ui| {
                                for kind in SalesPersonType::ALL {
                                    if ui
                                        .selectable_label(form.sales_p_type == Some(kind), kind.label())
                                        .clicked()
                                    {
                                        form.sales_p_type = Some(kind);
                                    }
                                }
                            });
                        field_error(ui, errors, "sales_p_type");
                    });
                    ui.end_row();
                });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.cancel_salesperson_dialog();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!app.salesperson_dialog.saving, |ui| {
                        if primary_button_with_icon(ui, "", "Save").clicked() {
                            app.save_salesperson();
                        }
                    });
                    if app.salesperson_dialog.saving {
                        ui.spinner();
                    }
                });
            });
        });
}
