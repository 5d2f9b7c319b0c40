//! New quotation builder.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{FLOPPY_DISK, PLUS};

use super::app::App;
use super::components::{back_button, field_error, form_row, panel_header, primary_button_with_icon, styled_button};
use super::line_table::{self, LineInputs};
use crate::validation::FieldErrors;

/// Show the new quotation form.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "New Quotation");

    let customers: Vec<(String, String)> = app
        .customers
        .items()
        .iter()
        .map(|c| (c.cus_code.clone(), c.cus_name.clone()))
        .collect();
    let salespersons: Vec<(String, String)> = app
        .salespersons
        .items()
        .iter()
        .map(|s| (s.sales_p_code.clone(), s.sales_p_name.clone()))
        .collect();
    let companies: Vec<(String, String)> = app.companies.iter().map(|c| (c.id.clone(), c.name.clone())).collect();

    ScrollArea::vertical().id_salt("new_quotation_scroll").show(ui, |ui| {
        let state = &mut app.new_quotation;

        egui::Grid::new("new_quotation_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                form_row(ui, "Quotation Name:", &mut state.draft.name, &state.errors, "quotation_name");

                ui.label("Customer:");
                ui.vertical(|ui| {
                    picker(ui, "customer_picker", &customers, &mut state.draft.customer);
                    field_error(ui, &state.errors, "customer");
                });
                ui.end_row();

                ui.label("Sales Person:");
                ui.vertical(|ui| {
                    picker(ui, "salesperson_picker", &salespersons, &mut state.draft.salesperson);
                    field_error(ui, &state.errors, "salesperson");
                });
                ui.end_row();

                ui.label("Company:");
                ui.vertical(|ui| {
                    picker(ui, "company_picker", &companies, &mut state.draft.company);
                    field_error(ui, &state.errors, "company");
                });
                ui.end_row();

                ui.label("Note:");
                ui.add(egui::TextEdit::multiline(&mut state.draft.note).desired_width(300.0).desired_rows(2));
                ui.end_row();
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("Items").strong().size(16.0));
        ui.add_space(5.0);

        let catalog: Vec<(String, String)> = app
            .items
            .items()
            .iter()
            .map(|i| (i.item_code.clone(), i.item_name.clone()))
            .collect();
        let mut add_clicked = false;
        ui.horizontal(|ui| {
            picker(ui, "new_item_picker", &catalog, &mut app.new_quotation.add_item);
            if styled_button(ui, &format!("{} Add Item", PLUS)).clicked() {
                add_clicked = true;
            }
        });
        if add_clicked {
            add_selected_item(app);
        }
        field_error(ui, &app.new_quotation.errors, "items");

        ui.add_space(10.0);

        let state = &mut app.new_quotation;
        LineInputs::sync(&mut state.inputs, state.draft.lines());
        if state.draft.lines().is_empty() {
            ui.label(RichText::new("No items added").weak());
        } else {
            let edits = line_table::show(ui, "new_quotation_lines", state.draft.lines(), &mut state.inputs, true);
            if let Some(message) = line_table::apply(&mut state.draft, &mut state.inputs, edits) {
                app.error_message = Some(message);
            }
        }

        ui.add_space(10.0);
        line_table::grand_total_label(ui, app.new_quotation.draft.grand_total());

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            if styled_button(ui, "Clear").clicked() {
                app.new_quotation.draft.reset();
                app.new_quotation.inputs.clear();
                app.new_quotation.errors = FieldErrors::new();
            }
            ui.add_space(10.0);
            ui.add_enabled_ui(!app.new_quotation.saving, |ui| {
                if primary_button_with_icon(ui, FLOPPY_DISK, "Create Quotation").clicked() {
                    app.submit_new_quotation();
                }
            });
            if app.new_quotation.saving {
                ui.spinner();
            }
        });
    });

    go_back
}

fn add_selected_item(app: &mut App) {
    let Some(code) = app.new_quotation.add_item.clone() else {
        return;
    };
    let Some(item) = app.items.items().iter().find(|i| i.item_code == code).cloned() else {
        return;
    };
    match app.new_quotation.draft.add_catalog_item(&item) {
        Ok(()) => app.new_quotation.add_item = None,
        Err(e) => app.error_message = Some(e.user_message("Unable to add item")),
    }
}

/// Combo box over `(code, name)` pairs storing the selected code.
pub fn picker(ui: &mut Ui, id: &str, options: &[(String, String)], selected: &mut Option<String>) {
    let text = selected
        .as_ref()
        .and_then(|code| options.iter().find(|(c, _)| c == code))
        .map(|(code, name)| format!("{name} ({code})"))
        .unwrap_or_else(|| "Select...".to_string());

    egui::ComboBox::from_id_salt(id)
        .width(280.0)
        .selected_text(text)
        .show_ui(ui, |ui| {
            for (code, name) in options {
                if ui
                    .selectable_label(selected.as_deref() == Some(code.as_str()), format!("{name} ({code})"))
                    .clicked()
                {
                    *selected = Some(code.clone());
                }
            }
        });
}
