//! Quotation detail view: header, line items, terms and workflow actions.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, CHECK, FLOPPY_DISK, PAPER_PLANE_TILT, PENCIL, PLUS, PRINTER, TRASH, X};

use super::app::{App, DeleteTarget, StatusDialog};
use super::components::{
    back_button, colors, field_error, form_row, panel_header, primary_button_with_icon, styled_button,
    styled_button_with_icon,
};
use super::line_table::{self, LineInputs};
use super::new_quotation::picker;
use super::quotations_panel::status_label;
use crate::export::export_quotation_detail;
use crate::quote::{Action, QuotationEditor};
use crate::reports::format_long_date;
use crate::validation::FieldErrors;

/// What the user asked for this frame.
enum Request {
    Action(Action),
    AddItem(String),
    Save,
    Cancel,
}

/// Show the detail view.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    let Some(editor) = app.view.editor.as_ref() else {
        panel_header(ui, "Quotation");
        if app.view.loading {
            ui.spinner();
        } else {
            ui.label(RichText::new("Quotation not loaded").weak());
        }
        return go_back;
    };

    panel_header(ui, &format!("Quotation {}", editor.header().quotation_code));

    let editing = editor.is_editing();
    let actions = app
        .ctx
        .actor()
        .map(|actor| editor.permitted_actions(&actor))
        .unwrap_or_default();
    let catalog: Vec<(String, String)> = if editing {
        app.items
            .items()
            .iter()
            .map(|i| (i.item_code.clone(), i.item_name.clone()))
            .collect()
    } else {
        Vec::new()
    };

    let mut request = None;
    let mut line_error = None;

    ScrollArea::vertical().id_salt("quotation_view_scroll").show(ui, |ui| {
        let view = &mut app.view;
        let Some(editor) = view.editor.as_mut() else {
            return;
        };

        header_grid(ui, editor, &view.errors);

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("Items").strong().size(16.0));
        ui.add_space(5.0);

        if editing {
            ui.horizontal(|ui| {
                picker(ui, "view_item_picker", &catalog, &mut view.add_item);
                if styled_button_with_icon(ui, PLUS, "Add Item").clicked()
                    && let Some(code) = view.add_item.clone()
                {
                    request = Some(Request::AddItem(code));
                }
            });
            ui.add_space(5.0);
        }

        LineInputs::sync(&mut view.inputs, editor.lines());
        let edits = line_table::show(ui, "quotation_lines", editor.lines(), &mut view.inputs, editing);
        line_error = line_table::apply(editor, &mut view.inputs, edits);
        field_error(ui, &view.errors, "items");

        ui.add_space(10.0);
        line_table::grand_total_label(ui, editor.grand_total());

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ui.label(RichText::new("Terms").strong().size(16.0));
        ui.add_space(5.0);
        terms_grid(ui, editor, &view.errors);

        ui.add_space(20.0);

        ui.horizontal(|ui| {
            if editing {
                if styled_button(ui, "Cancel").clicked() {
                    request = Some(Request::Cancel);
                }
                ui.add_space(10.0);
                ui.add_enabled_ui(!view.saving, |ui| {
                    if primary_button_with_icon(ui, FLOPPY_DISK, "Save").clicked() {
                        request = Some(Request::Save);
                    }
                });
            } else {
                ui.add_enabled_ui(!view.saving, |ui| {
                    for action in &actions {
                        if action_button(ui, *action).clicked() {
                            request = Some(Request::Action(*action));
                        }
                        ui.add_space(6.0);
                    }
                });
            }
            if view.saving {
                ui.spinner();
            }
        });
    });

    if let Some(message) = line_error {
        app.error_message = Some(message);
    }

    match request {
        Some(Request::Action(action)) => run_action(app, action),
        Some(Request::AddItem(code)) => add_item(app, &code),
        Some(Request::Save) => app.save_quotation(),
        Some(Request::Cancel) => app.cancel_quotation_edit(),
        None => {}
    }

    if app.view.status_dialog.is_some() {
        show_status_dialog(app, ui.ctx());
    }

    go_back
}

fn action_button(ui: &mut Ui, action: Action) -> egui::Response {
    let icon = match action {
        Action::Submit => PAPER_PLANE_TILT,
        Action::Resubmit => ARROWS_CLOCKWISE,
        Action::Edit => PENCIL,
        Action::Delete => TRASH,
        Action::Approve | Action::ReApprove => CHECK,
        Action::Reject => X,
        Action::Print => PRINTER,
    };
    match action {
        Action::Approve | Action::ReApprove | Action::Submit | Action::Resubmit => {
            primary_button_with_icon(ui, icon, action.label())
        }
        _ => styled_button_with_icon(ui, icon, action.label()),
    }
}

fn header_grid(ui: &mut Ui, editor: &mut QuotationEditor, errors: &FieldErrors) {
    let header = editor.header().clone();
    let editing = editor.is_editing();

    egui::Grid::new("quotation_header_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            if editing {
                form_row(ui, "Quotation Name:", &mut editor.name, errors, "quotation_name");
                form_row(ui, "Title:", &mut editor.title, errors, "title");
            } else {
                info_row(ui, "Quotation Name:", &editor.name);
                info_row(ui, "Title:", &editor.title);
            }

            ui.label("Status:");
            status_label(ui, header.status);
            ui.end_row();

            info_row(
                ui,
                "Date:",
                &header.quotation_date.map(format_long_date).unwrap_or_default(),
            );
            info_row(ui, "Customer:", &header.customer_name);
            info_row(ui, "Customer Address:", &header.customer_address);
            info_row(ui, "Company:", &header.company_name);
            for line in &header.company_address {
                info_row(ui, "", line);
            }
            info_row(ui, "Sales Person:", &header.salesperson_name);
            info_row(ui, "Created By:", &header.created_by);
            if !header.approved_by.is_empty() {
                info_row(ui, "Approved By:", &header.approved_by);
                info_row(
                    ui,
                    "Approved Date:",
                    &header.approved_date.map(format_long_date).unwrap_or_default(),
                );
            }
            if !header.approved_reason.is_empty() {
                info_row(ui, "Approval Reason:", &header.approved_reason);
            }
            if !header.rejected_reason.is_empty() {
                ui.label("Rejected Reason:");
                ui.colored_label(colors::ERROR, &header.rejected_reason);
                ui.end_row();
            }
            if !header.note.is_empty() {
                info_row(ui, "Note:", &header.note);
            }
        });
}

fn terms_grid(ui: &mut Ui, editor: &mut QuotationEditor, errors: &FieldErrors) {
    let editing = editor.is_editing();
    let terms = &mut editor.terms;

    egui::Grid::new("quotation_terms_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            let rows: [(&str, &mut String, &str); 7] = [
                ("Price Validity:", &mut terms.price_validity, "price_validity"),
                ("Delivery:", &mut terms.delivery, "delivery"),
                ("Payment Terms:", &mut terms.pay_terms, "pay_terms"),
                ("Remarks:", &mut terms.remarks, "remarks"),
                ("Warranty Void:", &mut terms.warranty_void, "warranty_void"),
                ("Taxes & Duties:", &mut terms.duties_taxes, "duties_taxes"),
                ("Stock Availability:", &mut terms.stock_avail, "stock_avail"),
            ];
            for (label, value, field) in rows {
                if editing {
                    form_row(ui, label, value, errors, field);
                } else {
                    info_row(ui, label, value);
                }
            }
        });
}

fn info_row(ui: &mut Ui, label: &str, value: &str) {
    ui.label(label);
    ui.label(RichText::new(value).strong());
    ui.end_row();
}

fn run_action(app: &mut App, action: Action) {
    match action {
        Action::Edit => app.begin_quotation_edit(),
        Action::Delete => {
            if let Some(editor) = &app.view.editor {
                let header = editor.header();
                let target = DeleteTarget::Quotation {
                    code: header.quotation_code.clone(),
                    name: header.quotation_name.clone(),
                };
                app.confirm_delete(target);
            }
        }
        Action::Print => {
            if let Some(editor) = app.view.editor.clone() {
                app.export_with("quotation", |path| export_quotation_detail(&editor, path));
            }
        }
        Action::Submit | Action::Resubmit => app.run_status_action(action, None),
        Action::Approve | Action::ReApprove | Action::Reject => {
            app.view.status_dialog = Some(StatusDialog {
                action,
                reason: String::new(),
            });
        }
    }
}

fn add_item(app: &mut App, code: &str) {
    let Some(item) = app.items.items().iter().find(|i| i.item_code == code).cloned() else {
        return;
    };
    let Some(editor) = app.view.editor.as_mut() else {
        return;
    };
    match editor.add_catalog_item(&item) {
        Ok(()) => app.view.add_item = None,
        Err(e) => app.error_message = Some(e.user_message("Unable to add item")),
    }
}

fn show_status_dialog(app: &mut App, ctx: &egui::Context) {
    let Some(dialog) = app.view.status_dialog.as_mut() else {
        return;
    };

    let mut confirm = false;
    let mut cancel = false;
    let required = dialog.action.requires_reason();

    egui::Window::new(format!("{} Quotation", dialog.action.label()))
        .collapsible(false)
        .resizable(false)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.label(if required { "Reason:" } else { "Reason (optional):" });
            ui.add(
                egui::TextEdit::multiline(&mut dialog.reason)
                    .desired_width(360.0)
                    .desired_rows(3),
            );
            let missing = required && dialog.reason.trim().is_empty();
            if missing {
                ui.colored_label(colors::ERROR, "A reason is required");
            }

            ui.add_space(15.0);
            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!missing, |ui| {
                        if primary_button_with_icon(ui, "", dialog.action.label()).clicked() {
                            confirm = true;
                        }
                    });
                });
            });
        });

    if cancel {
        app.view.status_dialog = None;
    } else if confirm && let Some(dialog) = app.view.status_dialog.take() {
        let reason = dialog.reason.trim();
        let reason = (!reason.is_empty()).then(|| reason.to_string());
        app.run_status_action(dialog.action, reason);
    }
}
