//! Dashboard panel with status cards, the month's quotations and weekly counts.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Sense, Ui};
use egui_phosphor::regular::{ADDRESS_BOOK, CHART_BAR, FILE_PLUS, FILE_TEXT, PACKAGE, USERS};

use super::app::{App, Panel};
use super::components::{colors, dashboard_card, styled_button_with_icon};
use crate::quote::format_amount;
use crate::reports::format_long_date;
use crate::stats::{self, Category};

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;
    let mut open_quotation = None;

    ScrollArea::vertical().id_salt("dashboard_scroll").show(ui, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);

            let name = app.ctx.user().map(|u| u.sales_p_name.clone()).unwrap_or_default();
            ui.label(RichText::new(format!("Welcome, {name}")).size(28.0).strong());
            ui.add_space(5.0);
            ui.label(RichText::new("Quotation, Customer and Sales Management").size(14.0).weak());
            ui.add_space(25.0);
        });

        // Status cards
        let cards = app.dashboard.counts.as_ref().map(stats::breakdown).unwrap_or_default();
        let total = app.dashboard.counts.as_ref().map(|c| c.total_count).unwrap_or(0);

        let available = ui.available_width();
        let spacing = 20.0;
        let card_width = ((available - spacing * 3.0) / 4.0).clamp(150.0, 240.0);
        let card_size = egui::vec2(card_width, card_width * 0.6);
        let start_offset = ((available - card_width * 4.0 - spacing * 3.0) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);
            for (idx, card) in cards.iter().enumerate() {
                if idx > 0 {
                    ui.add_space(spacing);
                }
                let response = dashboard_card(
                    ui,
                    card.category.label(),
                    &card.count.to_string(),
                    &card.percent,
                    card_size,
                );
                if response.clicked() {
                    app.dashboard.selected = if app.dashboard.selected == Some(card.category) {
                        None
                    } else {
                        Some(card.category)
                    };
                }
            }
        });

        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(format!("Total: {}", stats::quotation_label(total))).weak());
            if let Some(at) = app.dashboard.loaded_at {
                ui.label(
                    RichText::new(format!("Updated {}", at.format("%H:%M:%S")))
                        .small()
                        .weak(),
                );
            }
        });

        ui.add_space(20.0);

        if let Some(category) = app.dashboard.selected {
            open_quotation = category_table(app, ui, category);
            ui.add_space(20.0);
        }

        // Two-column layout: Quick links | Weekly chart
        let column_width = (ui.available_width() - 40.0) / 2.0;
        ui.horizontal(|ui| {
            ui.add_space(10.0);

            ui.vertical(|ui| {
                ui.set_width(column_width);
                section_frame(ui, column_width, "Quick Links", |ui| {
                    let size = egui::vec2((column_width - 60.0) / 3.0, 70.0);
                    ui.horizontal(|ui| {
                        if dashboard_card(ui, "Quotations", FILE_TEXT, "Browse", size).clicked() {
                            next_panel = Some(Panel::Quotations);
                        }
                        if dashboard_card(ui, "New", FILE_PLUS, "Quotation", size).clicked() {
                            next_panel = Some(Panel::NewQuotation);
                        }
                        if dashboard_card(ui, "Customers", ADDRESS_BOOK, "Manage", size).clicked() {
                            next_panel = Some(Panel::Customers);
                        }
                    });
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if dashboard_card(ui, "Items", PACKAGE, "Catalog", size).clicked() {
                            next_panel = Some(Panel::Items);
                        }
                        if dashboard_card(ui, "Sales Persons", USERS, "Team", size).clicked() {
                            next_panel = Some(Panel::SalesPersons);
                        }
                        if dashboard_card(ui, "Reports", CHART_BAR, "Export", size).clicked() {
                            next_panel = Some(Panel::Reports);
                        }
                    });
                    ui.add_space(10.0);
                    if styled_button_with_icon(ui, egui_phosphor::regular::ARROWS_CLOCKWISE, "Refresh").clicked() {
                        app.load_dashboard();
                    }
                });
            });

            ui.add_space(20.0);

            ui.vertical(|ui| {
                ui.set_width(column_width);
                section_frame(ui, column_width, "This Week", |ui| {
                    weekly_chart(ui, &stats::weekly_chart(&app.dashboard.weekly));
                });
            });
        });
    });

    if let Some(id) = open_quotation {
        app.open_quotation(&id);
    }

    next_panel
}

fn section_frame(ui: &mut Ui, width: f32, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(width - 30.0);
            ui.label(RichText::new(title).strong());
            ui.add_space(10.0);
            add_contents(ui);
        });
}

/// The month's quotations in one category. Returns an id to open.
fn category_table(app: &App, ui: &mut Ui, category: Category) -> Option<String> {
    let mut open = None;
    let rows = stats::in_category(&app.dashboard.monthly, category);

    section_frame(ui, ui.available_width(), &format!("{} this month", category.label()), |ui| {
        if rows.is_empty() {
            ui.label(RichText::new("No quotations").weak());
            return;
        }
        ScrollArea::vertical().max_height(220.0).id_salt("category_scroll").show(ui, |ui| {
            egui::Grid::new("category_grid")
                .num_columns(6)
                .striped(true)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("Code");
                    ui.strong("Name");
                    ui.strong("Customer");
                    ui.strong("Date");
                    ui.strong("Sales Person");
                    ui.strong("Amount");
                    ui.end_row();

                    for q in rows {
                        if ui.link(&q.quotation_code).clicked() {
                            open = Some(q.quotation_id.clone());
                        }
                        ui.label(&q.quotation_name);
                        ui.label(&q.cus_name);
                        ui.label(q.quotation_date.map(format_long_date).unwrap_or_default());
                        ui.label(&q.sales_p_name);
                        ui.label(format_amount(q.total_quotation_amount));
                        ui.end_row();
                    }
                });
        });
    });

    open
}

/// Horizontal bars, one per salesperson.
fn weekly_chart(ui: &mut Ui, rows: &[crate::models::WeeklyCount]) {
    if rows.is_empty() {
        ui.label(RichText::new("No quotations this week").weak());
        return;
    }

    let max = rows.iter().map(|r| r.quotation_count).max().unwrap_or(1).max(1) as f32;
    let label_width = 130.0;
    let bar_area = (ui.available_width() - label_width - 110.0).max(40.0);

    for row in rows {
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 18.0], egui::Label::new(&row.sales_p_name).truncate());
            let (rect, _) = ui.allocate_exact_size(egui::vec2(bar_area, 16.0), Sense::hover());
            let width = bar_area * (row.quotation_count as f32 / max);
            let bar = egui::Rect::from_min_size(rect.min, egui::vec2(width, rect.height()));
            ui.painter().rect_filled(rect, 3.0, Color32::from_gray(60));
            ui.painter().rect_filled(bar, 3.0, colors::PRIMARY);
            ui.label(RichText::new(stats::quotation_label(row.quotation_count)).small());
        });
    }
}
