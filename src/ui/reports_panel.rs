//! Customer and quotation reports with filters and Excel export.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use egui_phosphor::regular::{ARROWS_CLOCKWISE, FILE_XLS};

use super::app::{App, ReportTab};
use super::components::{back_button, panel_header, search_box, styled_button, styled_button_with_icon};
use super::quotations_panel::status_label;
use crate::export::{export_customer_report, export_quotation_report};
use crate::models::{Customer, QuotationSummary};
use crate::quote::format_amount;
use crate::reports::{ReportSummary, filter_customers, format_long_date};

/// Show the reports panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "Reports");

    // Report type toggle
    ui.horizontal(|ui| {
        ui.label("Report:");
        ui.add_space(10.0);

        if ui
            .selectable_label(app.reports.tab == ReportTab::Customers, "Customers")
            .clicked()
        {
            app.reports.tab = ReportTab::Customers;
        }

        if ui
            .selectable_label(app.reports.tab == ReportTab::Quotations, "Quotations")
            .clicked()
        {
            app.reports.tab = ReportTab::Quotations;
        }
    });

    ui.add_space(10.0);

    match app.reports.tab {
        ReportTab::Customers => customer_report(app, ui),
        ReportTab::Quotations => quotation_report(app, ui),
    }

    go_back
}

fn customer_report(app: &mut App, ui: &mut Ui) {
    let rows: Vec<Customer> = filter_customers(app.customers.items(), &app.reports.customer_query)
        .into_iter()
        .cloned()
        .collect();

    ui.horizontal(|ui| {
        search_box(ui, &mut app.reports.customer_query, "Name, address, contact...");
        if !app.reports.customer_query.is_empty() && styled_button(ui, "Clear").clicked() {
            app.reports.customer_query.clear();
        }

        ui.add_space(20.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_customers();
        }
        if styled_button_with_icon(ui, FILE_XLS, "Export").clicked() {
            let refs: Vec<&Customer> = rows.iter().collect();
            app.export_with("customer_report", |path| export_customer_report(&refs, path));
        }
    });

    ui.add_space(10.0);
    ui.label(format!("{} customers", rows.len()));
    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("customer_report_scroll").show(ui, |ui| {
        egui::Grid::new("customer_report_grid")
            .num_columns(6)
            .striped(true)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Code");
                ui.strong("Name");
                ui.strong("Address");
                ui.strong("VAT No");
                ui.strong("Contact Person");
                ui.strong("Contact No");
                ui.end_row();

                for c in &rows {
                    ui.label(&c.cus_code);
                    ui.label(&c.cus_name);
                    ui.label(&c.cus_addr);
                    ui.label(&c.cus_vat_no);
                    ui.label(&c.contact_person);
                    ui.label(&c.contact_p_no);
                    ui.end_row();
                }
            });
    });
}

fn quotation_report(app: &mut App, ui: &mut Ui) {
    let salespersons: Vec<(String, String)> = app
        .salespersons
        .items()
        .iter()
        .map(|s| (s.sales_p_code.clone(), s.sales_p_name.clone()))
        .collect();

    // Filters
    ui.horizontal(|ui| {
        let state = &mut app.reports;
        search_box(ui, &mut state.filter.search, "Code, name, customer...");

        ui.add_space(10.0);
        ui.checkbox(&mut state.use_start, "From:");
        ui.add_enabled(
            state.use_start,
            DatePickerButton::new(&mut state.start_date).id_salt("report_start"),
        );

        ui.add_space(10.0);
        ui.checkbox(&mut state.use_end, "To:");
        ui.add_enabled(
            state.use_end,
            DatePickerButton::new(&mut state.end_date).id_salt("report_end"),
        );

        ui.add_space(10.0);
        ui.label("Sales Person:");
        let selected = state
            .filter
            .salesperson
            .as_ref()
            .and_then(|code| salespersons.iter().find(|(c, _)| c == code))
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| "All".to_string());
        egui::ComboBox::from_id_salt("report_salesperson")
            .width(180.0)
            .selected_text(selected)
            .show_ui(ui, |ui| {
                if ui.selectable_label(state.filter.salesperson.is_none(), "All").clicked() {
                    state.filter.salesperson = None;
                }
                for (code, name) in &salespersons {
                    if ui
                        .selectable_label(state.filter.salesperson.as_deref() == Some(code.as_str()), name)
                        .clicked()
                    {
                        state.filter.salesperson = Some(code.clone());
                    }
                }
            });

        state.sync_dates();
    });

    let rows: Vec<QuotationSummary> = app
        .reports
        .filter
        .apply(app.quotations.items())
        .into_iter()
        .cloned()
        .collect();
    let refs: Vec<&QuotationSummary> = rows.iter().collect();
    let summary = ReportSummary::of(&refs);

    ui.add_space(10.0);

    ui.horizontal(|ui| {
        if styled_button(ui, "Reset Filters").clicked() {
            app.reports.filter = Default::default();
            app.reports.use_start = false;
            app.reports.use_end = false;
        }
        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_quotations();
        }
        if styled_button_with_icon(ui, FILE_XLS, "Export").clicked() {
            app.export_with("quotation_report", |path| export_quotation_report(&refs, &summary, path));
        }
    });

    ui.add_space(10.0);

    ui.horizontal(|ui| {
        summary_tile(ui, "Total", summary.total);
        summary_tile(ui, "Approved", summary.approved);
        summary_tile(ui, "Pending", summary.pending);
        if app.quotations.is_loading() {
            ui.spinner();
        }
    });

    ui.add_space(10.0);

    ScrollArea::vertical().id_salt("quotation_report_scroll").show(ui, |ui| {
        egui::Grid::new("quotation_report_grid")
            .num_columns(6)
            .striped(true)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                ui.strong("Customer");
                ui.strong("Quotation Name");
                ui.strong("Amount");
                ui.strong("Sales Person");
                ui.strong("Created Date");
                ui.strong("Status");
                ui.end_row();

                for q in &rows {
                    ui.label(&q.cus_name);
                    ui.label(&q.quotation_name);
                    ui.label(format_amount(q.total_quotation_amount));
                    ui.label(&q.sales_p_name);
                    ui.label(q.quotation_date.map(format_long_date).unwrap_or_default());
                    status_label(ui, q.quotation_status);
                    ui.end_row();
                }
            });
    });
}

fn summary_tile(ui: &mut Ui, label: &str, value: usize) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(egui::Margin::symmetric(16, 8))
        .corner_radius(egui::CornerRadius::same(6))
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value.to_string()).size(20.0).strong());
            });
        });
    ui.add_space(10.0);
}
