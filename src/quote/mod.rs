//! Quotation domain logic: line pricing, the status workflow, and the
//! editor and draft models behind the detail and "new quotation" views.
//!
//! Everything here is pure; network calls are issued by the UI with the
//! payloads these types produce.

mod draft;
mod editor;
mod line;
pub mod pricing;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use draft::QuotationDraft;
pub use editor::{EditorHeader, QuotationEditor, StatusRequest};
pub use line::{LineItem, LineTerms};
pub use pricing::{FieldError, LineAmounts, display_price, format_amount, grand_total};
pub use workflow::{Action, Actor, can_manage_catalog, permitted_actions, transition};
