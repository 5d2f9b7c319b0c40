//! Detail view model for an existing quotation.

use super::line::{LineItem, LineTerms};
use super::pricing::{self, FieldError};
use super::workflow::{self, Action, Actor};
use crate::error::{AppError, Result};
use crate::models::quotation::DEFAULT_TITLE;
use crate::models::{Item, QuotationDetailRow, QuotationStatus, StatusUpdate, SubmitStatus, UpdateQuotation};
use chrono::NaiveDate;

/// Header of a loaded quotation, taken from the first detail row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorHeader {
    pub quotation_id: String,
    pub quotation_code: String,
    pub quotation_name: String,
    pub quotation_date: Option<NaiveDate>,
    pub status: QuotationStatus,
    pub note: String,
    pub customer_name: String,
    pub customer_address: String,
    pub company_name: String,
    pub company_address: Vec<String>,
    /// Salesperson code that owns the quotation.
    pub owner_code: String,
    pub salesperson_name: String,
    pub created_by: String,
    pub approved_by: String,
    pub approved_date: Option<NaiveDate>,
    pub approved_reason: String,
    pub rejected_reason: String,
    pub title: String,
    pub terms: LineTerms,
}

impl EditorHeader {
    fn from_row(row: &QuotationDetailRow) -> Self {
        let owner_code = if row.sp_code.is_empty() {
            row.created_by.clone()
        } else {
            row.sp_code.clone()
        };
        Self {
            quotation_id: row.quotation_id.clone(),
            quotation_code: row.quotation_code.clone(),
            quotation_name: row.quotation_name.clone(),
            quotation_date: row.quotation_date,
            status: row.quotation_status,
            note: row.quotation_note.clone(),
            customer_name: row.cus_name.clone(),
            customer_address: row.cus_addr.clone(),
            company_name: row.company_name.clone(),
            company_address: [&row.company_addr_1, &row.company_addr_2]
                .into_iter()
                .filter(|l| !l.trim().is_empty())
                .cloned()
                .collect(),
            owner_code,
            salesperson_name: row.sales_p_name.clone(),
            created_by: row.created_by.clone(),
            approved_by: row.approved_by.clone(),
            approved_date: row.quotation_approved_date,
            approved_reason: row.quotation_approved_reason.clone(),
            rejected_reason: row.quotation_rejected_reason.clone(),
            title: row.title.clone(),
            terms: LineTerms::from_detail_row(row),
        }
    }
}

/// Status change request, routed to the submit or the approval endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusRequest {
    Submit(SubmitStatus),
    Decide(StatusUpdate),
}

/// Loaded quotation plus its in-progress edits.
///
/// Edits live next to the loaded snapshot; `cancel` drops them and
/// rehydrates from the snapshot.
#[derive(Debug, Clone)]
pub struct QuotationEditor {
    header: EditorHeader,
    snapshot: Vec<LineItem>,
    editing: bool,
    pub name: String,
    pub title: String,
    pub terms: LineTerms,
    lines: Vec<LineItem>,
}

impl QuotationEditor {
    /// Build from the detail endpoint's rows (one per line item).
    pub fn from_rows(rows: &[QuotationDetailRow]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| AppError::not_found("Quotation has no rows"))?;
        let header = EditorHeader::from_row(first);
        let snapshot: Vec<LineItem> = rows
            .iter()
            .filter(|r| !r.item_id.is_empty())
            .map(LineItem::from_detail_row)
            .collect();

        let mut editor = Self {
            header,
            snapshot,
            editing: false,
            name: String::new(),
            title: String::new(),
            terms: LineTerms::default(),
            lines: Vec::new(),
        };
        editor.hydrate();
        Ok(editor)
    }

    fn hydrate(&mut self) {
        self.name = self.header.quotation_name.clone();
        self.title = self.header.title.clone();
        self.terms = self.header.terms.clone();
        self.lines = self.snapshot.clone();
    }

    pub fn header(&self) -> &EditorHeader {
        &self.header
    }

    pub fn status(&self) -> QuotationStatus {
        self.header.status
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Actions offered to `actor` for the loaded status.
    pub fn permitted_actions(&self, actor: &Actor) -> Vec<Action> {
        workflow::permitted_actions(self.header.status, actor, &self.header.owner_code)
    }

    /// Enter edit mode when the gate allows it.
    pub fn begin_edit(&mut self, actor: &Actor) -> Result<()> {
        workflow::transition(self.header.status, Action::Edit, actor, &self.header.owner_code, None)?;
        self.editing = true;
        Ok(())
    }

    /// Leave edit mode and drop every unsaved change.
    pub fn cancel(&mut self) {
        self.hydrate();
        self.editing = false;
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

    /// Append a snapshot of a catalog item. The same item cannot appear twice.
    pub fn add_catalog_item(&mut self, item: &Item) -> Result<()> {
        if self.lines.iter().any(|l| l.item_code == item.item_code) {
            return Err(AppError::validation(format!("{} is already on this quotation", item.item_name)));
        }
        self.lines.push(LineItem::from_catalog(item));
        Ok(())
    }

    /// Remove a line. The last remaining line cannot be removed.
    pub fn remove_line(&mut self, index: usize) -> Result<()> {
        if index >= self.lines.len() {
            return Err(AppError::not_found(format!("Line {}", index + 1)));
        }
        if self.lines.len() == 1 {
            return Err(AppError::validation("A quotation must have at least one item"));
        }
        self.lines.remove(index);
        Ok(())
    }

    pub fn grand_total(&self) -> f64 {
        pricing::grand_total(self.lines.iter().map(LineItem::amounts))
    }

    /// Body for `PUT /v1/quotations/`.
    pub fn to_update_payload(&self) -> UpdateQuotation {
        let title = if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            self.title.trim()
        };
        UpdateQuotation {
            quotation_code: self.header.quotation_code.clone(),
            quotation_name: self.name.trim().to_string(),
            items: self.lines.iter().map(|l| l.to_draft_line(title, &self.terms)).collect(),
        }
    }

    /// Check the gate and build the request for a status-changing action.
    pub fn status_request(&self, action: Action, actor: &Actor, reason: Option<&str>) -> Result<StatusRequest> {
        let next = workflow::transition(self.header.status, action, actor, &self.header.owner_code, reason)?;
        if next == self.header.status {
            return Err(AppError::validation(format!("{action} does not change the status")));
        }

        let reason = reason.map(str::trim).filter(|r| !r.is_empty()).map(str::to_string);
        if action.is_submission() {
            return Ok(StatusRequest::Submit(SubmitStatus { quotation_status: next }));
        }

        let (approval_reason, rejected_reason) = match action {
            Action::Reject => (None, reason),
            _ => (reason, None),
        };
        Ok(StatusRequest::Decide(StatusUpdate {
            quotation_status: next,
            approved_by: actor.salesperson_code.clone(),
            approval_reason,
            rejected_reason,
        }))
    }
}
