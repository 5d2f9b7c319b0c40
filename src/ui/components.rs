//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};

use crate::validation::FieldErrors;

/// Render a clickable dashboard card with dynamic size.
///
/// Returns the response which can be checked for `.clicked()`.
pub fn dashboard_card(ui: &mut Ui, title: &str, value: &str, description: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());

    if ui.is_rect_visible(rect) {
        let visuals = ui.style().interact(&response);

        // Scale factor based on width (200 is the reference size)
        let scale = size.x / 200.0;

        ui.painter().rect_filled(rect, 8.0, visuals.bg_fill);
        ui.painter()
            .rect_stroke(rect, 8.0, visuals.bg_stroke, StrokeKind::Outside);

        let title_pos = egui::pos2(rect.center().x, rect.top() + size.y * 0.2);
        ui.painter().text(
            title_pos,
            egui::Align2::CENTER_CENTER,
            title,
            egui::FontId::proportional(15.0 * scale),
            visuals.text_color(),
        );

        let value_pos = egui::pos2(rect.center().x, rect.center().y + size.y * 0.03);
        ui.painter().text(
            value_pos,
            egui::Align2::CENTER_CENTER,
            value,
            egui::FontId::proportional(32.0 * scale),
            visuals.text_color(),
        );

        let desc_pos = egui::pos2(rect.center().x, rect.bottom() - size.y * 0.17);
        ui.painter().text(
            desc_pos,
            egui::Align2::CENTER_CENTER,
            description,
            egui::FontId::proportional(12.0 * scale),
            ui.visuals().weak_text_color(),
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const PRIMARY: Color32 = Color32::from_rgb(0x44, 0x72, 0xC4);
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Dashboard").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(text).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)).min_size(egui::vec2(80.0, 28.0)))
}

/// Filled button for the main action of a panel.
pub fn primary_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    let label = if icon.is_empty() {
        text.to_string()
    } else {
        format!("{icon} {text}")
    };
    ui.add(
        egui::Button::new(RichText::new(label).size(14.0).color(Color32::WHITE))
            .fill(colors::PRIMARY)
            .min_size(egui::vec2(80.0, 28.0)),
    )
}

/// Small icon button used in table rows.
pub fn action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0)).frame(false))
        .on_hover_text(tooltip)
}

pub fn danger_action_button(ui: &mut Ui, icon: &str, tooltip: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(icon).size(16.0).color(colors::ERROR)).frame(false))
        .on_hover_text(tooltip)
}

/// Inline message under a form field, if the field has one.
pub fn field_error(ui: &mut Ui, errors: &FieldErrors, field: &str) {
    if let Some(message) = errors.get(field) {
        ui.colored_label(colors::ERROR, RichText::new(message).small());
    }
}

/// Single-line text input with a label cell and its error underneath.
pub fn form_row(ui: &mut Ui, label: &str, value: &mut String, errors: &FieldErrors, field: &str) {
    ui.label(label);
    ui.vertical(|ui| {
        ui.add(egui::TextEdit::singleline(value).desired_width(280.0));
        field_error(ui, errors, field);
    });
    ui.end_row();
}

/// Multi-line variant of [`form_row`].
pub fn form_row_multiline(ui: &mut Ui, label: &str, value: &mut String, errors: &FieldErrors, field: &str) {
    ui.label(label);
    ui.vertical(|ui| {
        ui.add(egui::TextEdit::multiline(value).desired_width(280.0).desired_rows(2));
        field_error(ui, errors, field);
    });
    ui.end_row();
}

/// Search box bound to a list's query. Returns true when the text changed.
pub fn search_box(ui: &mut Ui, query: &mut String, hint: &str) -> bool {
    ui.label("Search:");
    ui.add(egui::TextEdit::singleline(query).desired_width(240.0).hint_text(hint))
        .changed()
}
