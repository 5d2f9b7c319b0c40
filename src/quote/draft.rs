//! Model behind the "new quotation" form.

use super::line::LineItem;
use super::pricing::{self, FieldError};
use crate::error::{AppError, Result};
use crate::models::quotation::DEFAULT_TITLE;
use crate::models::{CreateQuotation, Item};

/// Quotation being composed, before it exists on the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationDraft {
    pub name: String,
    /// Customer code.
    pub customer: Option<String>,
    /// Salesperson code.
    pub salesperson: Option<String>,
    /// Company id.
    pub company: Option<String>,
    pub note: String,
    lines: Vec<LineItem>,
}

impl QuotationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Append a snapshot of a catalog item. The same item cannot appear twice.
    pub fn add_catalog_item(&mut self, item: &Item) -> Result<()> {
        if self.lines.iter().any(|l| l.item_code == item.item_code) {
            return Err(AppError::validation(format!("{} is already added", item.item_name)));
        }
        self.lines.push(LineItem::from_catalog(item));
        Ok(())
    }

    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    pub fn set_quantity(&mut self, index: usize, input: &str) -> std::result::Result<(), FieldError> {
        match self.lines.get_mut(index) {
            Some(line) => line.set_quantity(input),
            None => Ok(()),
        }
    }

    pub fn set_unit_price(&mut self, index: usize, input: &str) -> std::result::Result<(), FieldError> {
        match self.lines.get_mut(index) {
            Some(line) => line.set_unit_price(input),
            None => Ok(()),
        }
    }

    pub fn set_vat(&mut self, index: usize, input: &str) -> std::result::Result<(), FieldError> {
        match self.lines.get_mut(index) {
            Some(line) => line.set_vat(input),
            None => Ok(()),
        }
    }

    pub fn set_description(&mut self, index: usize, value: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.description = value.to_string();
        }
    }

    pub fn set_warranty(&mut self, index: usize, value: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            line.warranty = value.to_string();
        }
    }

    pub fn grand_total(&self) -> f64 {
        pricing::grand_total(self.lines.iter().map(LineItem::amounts))
    }

    /// Body for `POST /v1/quotations`; `created_by` is the user's salesperson code.
    pub fn to_payload(&self, created_by: &str) -> CreateQuotation {
        CreateQuotation {
            quotation_name: self.name.trim().to_string(),
            customer: self.customer.clone().unwrap_or_default(),
            salesperson: self.salesperson.clone().unwrap_or_default(),
            company: self.company.clone().unwrap_or_default(),
            note: self.note.trim().to_string(),
            created_by: created_by.to_string(),
            items: self
                .lines
                .iter()
                .map(|l| l.to_draft_line(DEFAULT_TITLE, &l.terms))
                .collect(),
        }
    }
}
