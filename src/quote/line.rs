//! A quotation line: a snapshot of a catalog item plus a quantity.

use super::pricing::{self, FieldError, LineAmounts};
use crate::models::{DraftLine, Item, QuotationDetailRow};

/// Commercial terms carried with a line (or, in the editor, with the header).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineTerms {
    pub price_validity: String,
    pub delivery: String,
    pub pay_terms: String,
    pub remarks: String,
    pub warranty_void: String,
    pub duties_taxes: String,
    pub stock_avail: String,
}

impl LineTerms {
    pub fn from_item(item: &Item) -> Self {
        Self {
            price_validity: item.item_price_validity.clone(),
            delivery: item.item_delivery.clone(),
            pay_terms: item.item_pay_terms.clone(),
            remarks: item.item_remarks.clone(),
            warranty_void: item.item_warranty_void.clone(),
            duties_taxes: item.item_duties_taxes.clone(),
            stock_avail: item.item_stock_avail.clone(),
        }
    }

    pub fn from_detail_row(row: &QuotationDetailRow) -> Self {
        Self {
            price_validity: row.quotation_item_price_validity.clone(),
            delivery: row.quotation_item_delivery.clone(),
            pay_terms: row.quotation_item_pay_terms.clone(),
            remarks: row.quotation_item_remarks.clone(),
            warranty_void: row.quotation_item_warranty_void.clone(),
            duties_taxes: row.quotation_items_duties_taxes.clone(),
            stock_avail: row.quotation_item_stock_avail.clone(),
        }
    }
}

/// One line of a quotation.
///
/// Fields are copied from the catalog when the line is added and never
/// re-synced afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub item_code: String,
    pub item_name: String,
    pub description: String,
    pub warranty: String,
    unit_price: f64,
    vat: f64,
    quantity: u32,
    pub terms: LineTerms,
}

impl LineItem {
    /// Snapshot a catalog item with quantity 1.
    pub fn from_catalog(item: &Item) -> Self {
        Self {
            item_code: item.item_code.clone(),
            item_name: item.item_name.clone(),
            description: item.item_desc.clone(),
            warranty: item.item_warranty.clone(),
            unit_price: item.unit_price.clamp(0.0, pricing::MAX_UNIT_PRICE),
            vat: item.item_vat.clamp(0.0, pricing::MAX_VAT),
            quantity: pricing::MIN_QUANTITY,
            terms: LineTerms::from_item(item),
        }
    }

    pub fn from_detail_row(row: &QuotationDetailRow) -> Self {
        let quantity = u32::try_from(row.item_quantity)
            .unwrap_or(pricing::MIN_QUANTITY)
            .clamp(pricing::MIN_QUANTITY, pricing::MAX_QUANTITY);
        Self {
            item_code: row.item_id.clone(),
            item_name: row.item_name.clone(),
            description: row.quotation_item_desc.clone(),
            warranty: row.quotation_item_warranty.clone(),
            unit_price: row.quotation_unit_price,
            vat: row.quotation_item_vat,
            quantity,
            terms: LineTerms::from_detail_row(row),
        }
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn vat(&self) -> f64 {
        self.vat
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Apply a typed quantity; on error the current value is kept.
    pub fn set_quantity(&mut self, input: &str) -> Result<(), FieldError> {
        self.quantity = pricing::parse_quantity(input)?;
        Ok(())
    }

    /// Apply a typed unit price; on error the current value is kept.
    pub fn set_unit_price(&mut self, input: &str) -> Result<(), FieldError> {
        self.unit_price = pricing::parse_unit_price(input)?;
        Ok(())
    }

    /// Apply a typed VAT percentage; on error the current value is kept.
    pub fn set_vat(&mut self, input: &str) -> Result<(), FieldError> {
        self.vat = pricing::parse_vat(input)?;
        Ok(())
    }

    pub fn amounts(&self) -> LineAmounts {
        LineAmounts::compute(self.unit_price, self.vat, self.quantity)
    }

    /// Wire form, with the given title and terms.
    pub fn to_draft_line(&self, title: &str, terms: &LineTerms) -> DraftLine {
        DraftLine {
            item_code: self.item_code.clone(),
            quantity: self.quantity,
            description: self.description.clone(),
            unit_price: self.unit_price,
            vat: self.vat,
            price_validity: terms.price_validity.clone(),
            delivery: terms.delivery.clone(),
            pay_terms: terms.pay_terms.clone(),
            remarks: terms.remarks.clone(),
            warranty: self.warranty.clone(),
            warranty_void: terms.warranty_void.clone(),
            item_duties_taxes: terms.duties_taxes.clone(),
            title: title.to_string(),
            item_stock_avail: terms.stock_avail.clone(),
        }
    }
}
