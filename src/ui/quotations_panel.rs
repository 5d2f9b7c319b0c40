//! Quotation list with search and export.

use std::time::Instant;

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, EYE, FILE_PLUS, FILE_XLS};

use super::app::{App, Panel};
use super::components::{
    action_button, back_button, colors, panel_header, primary_button_with_icon, search_box, styled_button,
    styled_button_with_icon,
};
use crate::export::export_quotations_to_excel;
use crate::models::{QuotationStatus, QuotationSummary};
use crate::quote::format_amount;
use crate::reports::format_long_date;

/// Show the quotation list.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Quotations");

    let visible: Vec<QuotationSummary> = app.quotations.visible().into_iter().cloned().collect();

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, FILE_PLUS, "New Quotation").clicked() {
            app.navigate(Panel::NewQuotation);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_quotations();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export").clicked() && !visible.is_empty() {
            let rows: Vec<&QuotationSummary> = visible.iter().collect();
            app.export_with("quotations", |path| export_quotations_to_excel(&rows, path));
        }

        ui.add_space(20.0);

        if search_box(ui, &mut app.quotations.query, "Code, name, customer...") {
            app.quotations.query_changed(Instant::now());
        }
        if !app.quotations.query.is_empty() && styled_button(ui, "Clear").clicked() {
            app.quotations.clear_search();
        }
    });

    ui.add_space(15.0);

    ui.horizontal(|ui| {
        ui.label(format!(
            "Showing {} of {} quotations",
            visible.len(),
            app.quotations.items().len()
        ));
        if app.quotations.is_loading() {
            ui.spinner();
        }
    });

    ui.add_space(10.0);

    let mut open = None;
    ScrollArea::vertical().id_salt("quotation_scroll").show(ui, |ui| {
        egui::Grid::new("quotations_grid")
            .num_columns(9)
            .striped(true)
            .min_col_width(60.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Customer");
                ui.strong("Created");
                ui.strong("Created By");
                ui.strong("Sales Person");
                ui.strong("Status");
                ui.strong("Amount");
                ui.strong("");
                ui.end_row();

                for q in &visible {
                    ui.label(&q.quotation_code);
                    ui.label(&q.quotation_name);
                    ui.label(&q.cus_name);
                    ui.label(q.quotation_date.map(format_long_date).unwrap_or_default());
                    ui.label(&q.created_by);
                    ui.label(&q.sales_p_name);
                    status_label(ui, q.quotation_status);
                    ui.label(format_amount(q.total_quotation_amount));
                    if action_button(ui, EYE, "View").clicked() {
                        open = Some(q.quotation_id.clone());
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(id) = open {
        app.open_quotation(&id);
    }

    go_back
}

/// Colored status text.
pub fn status_label(ui: &mut Ui, status: QuotationStatus) {
    let color = match status {
        QuotationStatus::Approved | QuotationStatus::ReApproved => colors::SUCCESS,
        QuotationStatus::Rejected => colors::ERROR,
        QuotationStatus::PendingApproval | QuotationStatus::Resubmitted => colors::WARNING,
        _ => colors::NEUTRAL,
    };
    ui.label(RichText::new(status.label()).color(color));
}
