//! Line-item grid shared by the new quotation builder and the detail view.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::TRASH;

use super::components::danger_action_button;
use crate::quote::{FieldError, LineItem, QuotationDraft, QuotationEditor, display_price, format_amount};

/// Text buffers behind one row's inputs.
///
/// Numeric fields are committed when the input loses focus; a rejected
/// value resets the buffer so the prior value stays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineInputs {
    pub quantity: String,
    pub unit_price: String,
    pub vat: String,
    pub description: String,
    pub warranty: String,
}

impl LineInputs {
    pub fn of(line: &LineItem) -> Self {
        Self {
            quantity: line.quantity().to_string(),
            unit_price: line.unit_price().to_string(),
            vat: line.vat().to_string(),
            description: line.description.clone(),
            warranty: line.warranty.clone(),
        }
    }

    /// Rebuild buffers when the line list no longer matches them.
    pub fn sync(inputs: &mut Vec<Self>, lines: &[LineItem]) {
        if inputs.len() != lines.len() {
            *inputs = lines.iter().map(Self::of).collect();
        }
    }
}

/// A change requested from the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    Quantity(usize, String),
    UnitPrice(usize, String),
    Vat(usize, String),
    Description(usize, String),
    Warranty(usize, String),
    Remove(usize),
}

/// Models whose line items the grid can edit.
pub trait EditableLines {
    fn lines(&self) -> &[LineItem];
    fn set_quantity(&mut self, index: usize, input: &str) -> Result<(), FieldError>;
    fn set_unit_price(&mut self, index: usize, input: &str) -> Result<(), FieldError>;
    fn set_vat(&mut self, index: usize, input: &str) -> Result<(), FieldError>;
    fn set_description(&mut self, index: usize, value: &str);
    fn set_warranty(&mut self, index: usize, value: &str);
    fn remove(&mut self, index: usize) -> crate::Result<()>;
}

impl EditableLines for QuotationDraft {
    fn lines(&self) -> &[LineItem] {
        QuotationDraft::lines(self)
    }
    fn set_quantity(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationDraft::set_quantity(self, index, input)
    }
    fn set_unit_price(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationDraft::set_unit_price(self, index, input)
    }
    fn set_vat(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationDraft::set_vat(self, index, input)
    }
    fn set_description(&mut self, index: usize, value: &str) {
        QuotationDraft::set_description(self, index, value)
    }
    fn set_warranty(&mut self, index: usize, value: &str) {
        QuotationDraft::set_warranty(self, index, value)
    }
    fn remove(&mut self, index: usize) -> crate::Result<()> {
        self.remove_line(index);
        Ok(())
    }
}

impl EditableLines for QuotationEditor {
    fn lines(&self) -> &[LineItem] {
        QuotationEditor::lines(self)
    }
    fn set_quantity(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationEditor::set_quantity(self, index, input)
    }
    fn set_unit_price(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationEditor::set_unit_price(self, index, input)
    }
    fn set_vat(&mut self, index: usize, input: &str) -> Result<(), FieldError> {
        QuotationEditor::set_vat(self, index, input)
    }
    fn set_description(&mut self, index: usize, value: &str) {
        QuotationEditor::set_description(self, index, value)
    }
    fn set_warranty(&mut self, index: usize, value: &str) {
        QuotationEditor::set_warranty(self, index, value)
    }
    fn remove(&mut self, index: usize) -> crate::Result<()> {
        self.remove_line(index)
    }
}

/// Apply grid edits. Returns the first error message, if any.
///
/// Buffers are rebuilt from the model afterwards, so rejected input reverts.
pub fn apply(target: &mut impl EditableLines, inputs: &mut Vec<LineInputs>, edits: Vec<LineEdit>) -> Option<String> {
    let mut error = None;
    for edit in edits {
        let result = match edit {
            LineEdit::Quantity(i, v) => target.set_quantity(i, &v).map_err(|e| e.to_string()),
            LineEdit::UnitPrice(i, v) => target.set_unit_price(i, &v).map_err(|e| e.to_string()),
            LineEdit::Vat(i, v) => target.set_vat(i, &v).map_err(|e| e.to_string()),
            LineEdit::Description(i, v) => {
                target.set_description(i, &v);
                continue;
            }
            LineEdit::Warranty(i, v) => {
                target.set_warranty(i, &v);
                continue;
            }
            LineEdit::Remove(i) => target.remove(i).map_err(|e| e.user_message("Unable to remove item")),
        };
        if let Err(message) = result {
            error.get_or_insert(message);
        }
        *inputs = target.lines().iter().map(LineInputs::of).collect();
    }
    error
}

/// Render the grid. Read-only when `editable` is false.
pub fn show(ui: &mut Ui, id: &str, lines: &[LineItem], inputs: &mut [LineInputs], editable: bool) -> Vec<LineEdit> {
    let mut edits = Vec::new();

    ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
        egui::Grid::new(id)
            .num_columns(if editable { 10 } else { 9 })
            .striped(true)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Item");
                ui.strong("Description");
                ui.strong("Warranty");
                ui.strong("Qty");
                ui.strong("Unit Price");
                ui.strong("VAT %");
                ui.strong("Subtotal");
                ui.strong("Unit incl. VAT");
                ui.strong("Total incl. VAT");
                if editable {
                    ui.strong("");
                }
                ui.end_row();

                for (idx, (line, input)) in lines.iter().zip(inputs.iter_mut()).enumerate() {
                    let amounts = line.amounts();
                    ui.label(&line.item_name);

                    if editable {
                        if ui
                            .add(egui::TextEdit::singleline(&mut input.description).desired_width(200.0))
                            .changed()
                        {
                            edits.push(LineEdit::Description(idx, input.description.clone()));
                        }
                        if ui
                            .add(egui::TextEdit::singleline(&mut input.warranty).desired_width(90.0))
                            .changed()
                        {
                            edits.push(LineEdit::Warranty(idx, input.warranty.clone()));
                        }
                        if ui
                            .add(egui::TextEdit::singleline(&mut input.quantity).desired_width(50.0))
                            .lost_focus()
                        {
                            edits.push(LineEdit::Quantity(idx, input.quantity.clone()));
                        }
                        if ui
                            .add(egui::TextEdit::singleline(&mut input.unit_price).desired_width(90.0))
                            .lost_focus()
                        {
                            edits.push(LineEdit::UnitPrice(idx, input.unit_price.clone()));
                        }
                        if ui
                            .add(egui::TextEdit::singleline(&mut input.vat).desired_width(50.0))
                            .lost_focus()
                        {
                            edits.push(LineEdit::Vat(idx, input.vat.clone()));
                        }
                    } else {
                        ui.label(&line.description);
                        ui.label(&line.warranty);
                        ui.label(line.quantity().to_string());
                        ui.label(display_price(&amounts, amounts.unit_price));
                        ui.label(format!("{}", line.vat()));
                    }

                    ui.label(display_price(&amounts, amounts.subtotal));
                    ui.label(display_price(&amounts, amounts.unit_price_incl_vat));
                    ui.label(display_price(&amounts, amounts.total_incl_vat));

                    if editable && danger_action_button(ui, TRASH, "Remove").clicked() {
                        edits.push(LineEdit::Remove(idx));
                    }
                    ui.end_row();
                }
            });
    });

    edits
}

/// "Grand Total: 1,234.00" line under the grid.
pub fn grand_total_label(ui: &mut Ui, total: f64) {
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(format_amount(total)).strong().size(16.0));
            ui.label(RichText::new("Grand Total:").strong().size(16.0));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    fn item(code: &str, price: f64) -> Item {
        Item {
            item_code: code.to_string(),
            item_name: code.to_string(),
            unit_price: price,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejected_quantity_reverts_buffer() {
        let mut draft = QuotationDraft::new();
        draft.add_catalog_item(&item("IT-1", 100.0)).unwrap();
        let mut inputs = Vec::new();
        LineInputs::sync(&mut inputs, draft.lines());

        inputs[0].quantity = "1001".to_string();
        let error = apply(&mut draft, &mut inputs, vec![LineEdit::Quantity(0, "1001".to_string())]);

        assert!(error.is_some());
        assert_eq!(draft.lines()[0].quantity(), 1);
        assert_eq!(inputs[0].quantity, "1");
    }

    #[test]
    fn test_editor_keeps_last_line() {
        let rows = vec![crate::models::QuotationDetailRow {
            quotation_code: "Q-1".to_string(),
            item_id: "IT-1".to_string(),
            item_quantity: 1,
            ..Default::default()
        }];
        let mut editor = QuotationEditor::from_rows(&rows).unwrap();
        let mut inputs = Vec::new();
        LineInputs::sync(&mut inputs, editor.lines());

        let error = apply(&mut editor, &mut inputs, vec![LineEdit::Remove(0)]);
        assert_eq!(error.as_deref(), Some("A quotation must have at least one item"));
        assert_eq!(editor.lines().len(), 1);
    }
}
