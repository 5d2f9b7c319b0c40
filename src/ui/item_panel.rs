//! Item catalog panel.

use std::time::Instant;

use eframe::egui::{self, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget, ItemDialog};
use super::components::{
    action_button, back_button, danger_action_button, form_row, form_row_multiline, panel_header,
    primary_button_with_icon, search_box, styled_button, styled_button_with_icon,
};
use crate::quote::{LineAmounts, can_manage_catalog, display_price};

/// Show the item panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Items");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Item").clicked() && app.items.editing().is_none() {
            app.item_dialog = ItemDialog::create();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_items();
        }

        ui.add_space(20.0);

        if search_box(ui, &mut app.items.query, "Item name...") {
            app.items.query_changed(Instant::now());
        }
        if !app.items.query.is_empty() && styled_button(ui, "Clear").clicked() {
            app.items.clear_search();
        }
    });

    ui.add_space(15.0);

    show_table(app, ui);

    if app.item_dialog.is_open {
        show_form_dialog(app, ui.ctx());
    }

    go_back
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let manage = app.ctx.user().is_some_and(|u| can_manage_catalog(u.sales_p_type));
    let visible: Vec<_> = app.items.visible().into_iter().cloned().collect();

    ui.label(format!("Showing {} of {} items", visible.len(), app.items.items().len()));
    if app.items.is_loading() {
        ui.spinner();
    }

    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("item_scroll").show(ui, |ui| {
        egui::Grid::new("items_grid")
            .num_columns(7)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Unit Price");
                ui.strong("VAT %");
                ui.strong("Warranty");
                ui.strong("Stock");
                ui.strong("Actions");
                ui.end_row();

                for item in &visible {
                    let amounts = LineAmounts::compute(item.unit_price, item.item_vat, 1);
                    ui.label(&item.item_code);
                    ui.label(&item.item_name);
                    ui.label(display_price(&amounts, amounts.unit_price));
                    ui.label(format!("{}", item.item_vat));
                    ui.label(&item.item_warranty);
                    ui.label(&item.item_stock_avail);

                    ui.horizontal(|ui| {
                        if !manage {
                            ui.weak("-");
                            return;
                        }
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            app.begin_item_edit(item);
                        }
                        ui.add_space(4.0);
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            app.confirm_delete(DeleteTarget::Item {
                                code: item.item_code.clone(),
                                name: item.item_name.clone(),
                            });
                        }
                    });

                    ui.end_row();
                }
            });
    });
}

fn show_form_dialog(app: &mut App, ctx: &egui::Context) {
    let title = if app.item_dialog.is_editing() {
        "Edit Item"
    } else {
        "Add Item"
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .max_height(560.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);

            let dialog = &mut app.item_dialog;
            ScrollArea::vertical().max_height(440.0).show(ui, |ui| {
                egui::Grid::new("item_form_grid")
                    .num_columns(2)
                    .spacing([20.0, 10.0])
                    .show(ui, |ui| {
                        let info = &mut dialog.info;
                        let errors = &dialog.errors;
                        form_row(ui, "Item Name:", &mut info.item_name, errors, "item_name");
                        form_row(ui, "Unit Price:", &mut info.unit_price, errors, "unit_price");
                        form_row(ui, "VAT %:", &mut info.item_vat_no, errors, "item_vat_no");
                        form_row_multiline(ui, "Description:", &mut info.item_description, errors, "item_description");
                        form_row(ui, "Price Validity:", &mut info.item_price_validity, errors, "item_price_validity");
                        form_row(ui, "Delivery:", &mut info.item_delivery, errors, "item_delivery");
                        form_row(ui, "Payment Terms:", &mut info.item_pay_terms, errors, "item_pay_terms");
                        form_row(ui, "Warranty:", &mut info.item_warranty, errors, "item_warranty");
                        form_row(ui, "Warranty Void:", &mut info.item_warranty_void, errors, "item_warranty_void");
                        form_row(
                            ui,
                            "Taxes & Duties:",
                            &mut info.item_taxes_and_duties,
                            errors,
                            "item_taxes_and_duties",
                        );
                        form_row(
                            ui,
                            "Stock Availability:",
                            &mut info.item_stock_availability,
                            errors,
                            "item_stock_availability",
                        );
                        form_row_multiline(ui, "Remarks:", &mut info.item_remarks, errors, "item_remarks");
                    });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    app.cancel_item_dialog();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!app.item_dialog.saving, |ui| {
                        if primary_button_with_icon(ui, "", "Save").clicked() {
                            app.save_item();
                        }
                    });
                    if app.item_dialog.saving {
                        ui.spinner();
                    }
                });
            });
        });
}
