//! Unit tests for the quotation editor and draft.

use super::editor::StatusRequest;
use super::pricing::{display_price, format_amount};
use super::{Action, Actor, QuotationDraft, QuotationEditor};
use crate::error::AppError;
use crate::models::{Item, QuotationDetailRow, QuotationStatus, SalesPersonType};

fn row(item_id: &str, price: f64, vat: f64, qty: i64, status: QuotationStatus) -> QuotationDetailRow {
    QuotationDetailRow {
        quotation_id: "42".to_string(),
        quotation_code: "Q-0042".to_string(),
        quotation_name: "Office fit-out".to_string(),
        quotation_status: status,
        sp_code: "SP05".to_string(),
        title: "Mr. Perera".to_string(),
        quotation_item_pay_terms: "30 days credit".to_string(),
        item_id: item_id.to_string(),
        item_name: format!("Item {item_id}"),
        quotation_item_desc: "desc".to_string(),
        quotation_item_vat: vat,
        item_quantity: qty,
        quotation_unit_price: price,
        ..Default::default()
    }
}

fn catalog_item(code: &str, price: f64, vat: f64) -> Item {
    Item {
        item_code: code.to_string(),
        item_name: format!("Catalog {code}"),
        unit_price: price,
        item_vat: vat,
        item_desc: "from catalog".to_string(),
        item_delivery: "2 weeks".to_string(),
        ..Default::default()
    }
}

fn owner() -> Actor {
    Actor {
        role: SalesPersonType::Member,
        salesperson_code: "SP05".to_string(),
    }
}

fn approver() -> Actor {
    Actor {
        role: SalesPersonType::Approver,
        salesperson_code: "SP01".to_string(),
    }
}

fn saved_editor() -> QuotationEditor {
    QuotationEditor::from_rows(&[
        row("IT-1", 100.0, 10.0, 2, QuotationStatus::Saved),
        row("IT-2", 0.0, 0.0, 5, QuotationStatus::Saved),
    ])
    .unwrap()
}

#[test]
fn test_worked_example_totals() {
    let editor = saved_editor();
    let lines = editor.lines();
    let first = lines[0].amounts();
    let second = lines[1].amounts();

    assert_eq!(display_price(&first, first.total_incl_vat), "220.00");
    assert_eq!(display_price(&second, second.total_incl_vat), "FOC");
    assert_eq!(format_amount(editor.grand_total()), "220.00");
}

#[test]
fn test_header_from_first_row() {
    let editor = saved_editor();
    assert_eq!(editor.header().quotation_code, "Q-0042");
    assert_eq!(editor.header().owner_code, "SP05");
    assert_eq!(editor.name, "Office fit-out");
    assert_eq!(editor.terms.pay_terms, "30 days credit");
}

#[test]
fn test_empty_rows_not_found() {
    assert!(matches!(QuotationEditor::from_rows(&[]), Err(AppError::NotFound(_))));
}

#[test]
fn test_invalid_quantity_keeps_previous() {
    let mut editor = saved_editor();
    assert!(editor.set_quantity(0, "0").is_err());
    assert!(editor.set_quantity(0, "1001").is_err());
    assert_eq!(editor.lines()[0].quantity(), 2);

    editor.set_quantity(0, "3").unwrap();
    assert_eq!(editor.lines()[0].quantity(), 3);
}

#[test]
fn test_invalid_price_and_vat_keep_previous() {
    let mut editor = saved_editor();
    assert!(editor.set_unit_price(0, "-5").is_err());
    assert!(editor.set_vat(0, "150").is_err());
    assert_eq!(editor.lines()[0].unit_price(), 100.0);
    assert_eq!(editor.lines()[0].vat(), 10.0);
}

#[test]
fn test_cancel_rehydrates() {
    let mut editor = saved_editor();
    editor.begin_edit(&owner()).unwrap();
    editor.name = "Changed".to_string();
    editor.set_quantity(0, "9").unwrap();
    editor.add_catalog_item(&catalog_item("IT-3", 10.0, 0.0)).unwrap();

    editor.cancel();
    assert!(!editor.is_editing());
    assert_eq!(editor.name, "Office fit-out");
    assert_eq!(editor.lines().len(), 2);
    assert_eq!(editor.lines()[0].quantity(), 2);
}

#[test]
fn test_edit_gate() {
    let mut editor = QuotationEditor::from_rows(&[row("IT-1", 1.0, 0.0, 1, QuotationStatus::Approved)]).unwrap();
    assert!(matches!(editor.begin_edit(&approver()), Err(AppError::Forbidden(_))));
    assert!(!editor.is_editing());
}

#[test]
fn test_cannot_remove_last_line() {
    let mut editor = saved_editor();
    editor.remove_line(1).unwrap();
    assert!(matches!(editor.remove_line(0), Err(AppError::Validation(_))));
    assert_eq!(editor.lines().len(), 1);
}

#[test]
fn test_duplicate_catalog_item_rejected() {
    let mut editor = saved_editor();
    assert!(editor.add_catalog_item(&catalog_item("IT-1", 5.0, 0.0)).is_err());

    let mut draft = QuotationDraft::new();
    draft.add_catalog_item(&catalog_item("IT-9", 5.0, 0.0)).unwrap();
    assert!(draft.add_catalog_item(&catalog_item("IT-9", 5.0, 0.0)).is_err());
    assert_eq!(draft.lines().len(), 1);
}

#[test]
fn test_catalog_snapshot_is_independent() {
    let mut item = catalog_item("IT-7", 250.0, 18.0);
    let mut draft = QuotationDraft::new();
    draft.add_catalog_item(&item).unwrap();

    item.unit_price = 999.0;
    item.item_desc = "changed".to_string();
    assert_eq!(draft.lines()[0].unit_price(), 250.0);
    assert_eq!(draft.lines()[0].description, "from catalog");
}

#[test]
fn test_update_payload() {
    let mut editor = saved_editor();
    editor.title = String::new();
    editor.set_description(1, "Free install");
    let payload = editor.to_update_payload();

    assert_eq!(payload.quotation_code, "Q-0042");
    assert_eq!(payload.items.len(), 2);
    assert_eq!(payload.items[0].title, "Sir/Madam");
    assert_eq!(payload.items[0].pay_terms, "30 days credit");
    assert_eq!(payload.items[1].description, "Free install");
    assert_eq!(payload.items[1].quantity, 5);
}

#[test]
fn test_draft_payload() {
    let mut draft = QuotationDraft::new();
    draft.name = " Lab PCs ".to_string();
    draft.customer = Some("C0001".to_string());
    draft.salesperson = Some("SP05".to_string());
    draft.company = Some("1".to_string());
    draft.add_catalog_item(&catalog_item("IT-4", 1200.0, 18.0)).unwrap();
    draft.set_quantity(0, "10").unwrap();

    let payload = draft.to_payload("SP05");
    assert_eq!(payload.quotation_name, "Lab PCs");
    assert_eq!(payload.created_by, "SP05");
    assert_eq!(payload.items[0].quantity, 10);
    assert_eq!(payload.items[0].delivery, "2 weeks");
    assert_eq!(payload.items[0].title, "Sir/Madam");
    assert!((draft.grand_total() - 14_160.0).abs() < 1e-6);

    draft.reset();
    assert!(draft.lines().is_empty());
    assert!(draft.customer.is_none());
}

#[test]
fn test_submit_request() {
    let editor = saved_editor();
    let request = editor.status_request(Action::Submit, &owner(), None).unwrap();
    assert_eq!(
        request,
        StatusRequest::Submit(crate::models::SubmitStatus {
            quotation_status: QuotationStatus::PendingApproval
        })
    );
}

#[test]
fn test_reject_request_carries_reason() {
    let editor = QuotationEditor::from_rows(&[row("IT-1", 1.0, 0.0, 1, QuotationStatus::Resubmitted)]).unwrap();
    match editor.status_request(Action::Reject, &approver(), Some(" Price too high ")).unwrap() {
        StatusRequest::Decide(update) => {
            assert_eq!(update.quotation_status, QuotationStatus::Rejected);
            assert_eq!(update.approved_by, "SP01");
            assert_eq!(update.rejected_reason.as_deref(), Some("Price too high"));
            assert!(update.approval_reason.is_none());
        }
        other => panic!("unexpected request: {other:?}"),
    }
}

#[test]
fn test_member_cannot_approve() {
    let editor = QuotationEditor::from_rows(&[row("IT-1", 1.0, 0.0, 1, QuotationStatus::PendingApproval)]).unwrap();
    assert!(editor.status_request(Action::Approve, &owner(), None).is_err());
    assert!(editor.permitted_actions(&owner()).is_empty());
}
