//! Quotation DTOs: list rows, detail rows and mutation bodies.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Salutation the backend stores when none is chosen.
pub const DEFAULT_TITLE: &str = "Sir/Madam";

/// Lifecycle state of a quotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "StatusRepr", into = "u8")]
pub enum QuotationStatus {
    #[default]
    Saved = 1,
    PendingApproval = 2,
    Approved = 3,
    Rejected = 4,
    Resubmitted = 5,
    ReApproved = 6,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Number(i64),
    Text(String),
}

impl TryFrom<StatusRepr> for QuotationStatus {
    type Error = String;

    fn try_from(repr: StatusRepr) -> Result<Self, Self::Error> {
        let code = match repr {
            StatusRepr::Number(n) => n,
            StatusRepr::Text(s) => s.trim().parse().map_err(|_| format!("invalid status '{s}'"))?,
        };
        Self::from_code(code).ok_or_else(|| format!("unknown status {code}"))
    }
}

impl From<QuotationStatus> for u8 {
    fn from(status: QuotationStatus) -> Self {
        status as u8
    }
}

impl QuotationStatus {
    pub const ALL: [QuotationStatus; 6] = [
        Self::Saved,
        Self::PendingApproval,
        Self::Approved,
        Self::Rejected,
        Self::Resubmitted,
        Self::ReApproved,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Saved),
            2 => Some(Self::PendingApproval),
            3 => Some(Self::Approved),
            4 => Some(Self::Rejected),
            5 => Some(Self::Resubmitted),
            6 => Some(Self::ReApproved),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::PendingApproval => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Resubmitted => "Resubmitted",
            Self::ReApproved => "ReApproved",
        }
    }

    /// Approved or re-approved: eligible for print and export.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Approved | Self::ReApproved)
    }

    /// Waiting on an approver.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::PendingApproval | Self::Resubmitted)
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row of `GET /v1/quotations` (and `/by-month`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotationSummary {
    #[serde(default, deserialize_with = "super::de::id")]
    pub quotation_id: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_name: String,
    #[serde(default, deserialize_with = "super::de::optional_date")]
    pub quotation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::de::text")]
    pub created_by: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub approved_by: String,
    #[serde(default, deserialize_with = "super::de::optional_date")]
    pub quotation_approved_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::de::status")]
    pub quotation_status: QuotationStatus,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sp_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_name: String,
    #[serde(default, deserialize_with = "super::de::number")]
    pub total_quotation_amount: f64,
}

/// Row of `GET /v1/quotations/{id}`: one line item with the header repeated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotationDetailRow {
    #[serde(default, deserialize_with = "super::de::id")]
    pub quotation_id: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_name: String,
    #[serde(default, deserialize_with = "super::de::optional_date")]
    pub quotation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::de::status")]
    pub quotation_status: QuotationStatus,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_note: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_addr: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub company_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub company_addr_1: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub company_addr_2: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sp_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub created_by: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub approved_by: String,
    #[serde(default, deserialize_with = "super::de::optional_date")]
    pub quotation_approved_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_approved_reason: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_rejected_reason: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_pay_terms: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_price_validity: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_delivery: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_remarks: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_warranty_void: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_items_duties_taxes: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_stock_avail: String,

    // Line item
    #[serde(default, deserialize_with = "super::de::id")]
    pub item_id: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_desc: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub quotation_item_warranty: String,
    #[serde(default, deserialize_with = "super::de::number")]
    pub quotation_item_vat: f64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub item_quantity: i64,
    #[serde(default, deserialize_with = "super::de::number")]
    pub quotation_unit_price: f64,
}

/// Line entry in the create and edit bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    pub item_code: String,
    pub quantity: u32,
    pub description: String,
    pub unit_price: f64,
    pub vat: f64,
    pub price_validity: String,
    pub delivery: String,
    pub pay_terms: String,
    pub remarks: String,
    pub warranty: String,
    pub warranty_void: String,
    pub item_duties_taxes: String,
    pub title: String,
    pub item_stock_avail: String,
}

/// Body of `POST /v1/quotations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateQuotation {
    #[serde(rename = "quotationName")]
    pub quotation_name: String,
    /// Customer code.
    pub customer: String,
    /// Salesperson code.
    pub salesperson: String,
    /// Company id.
    pub company: String,
    /// The backend spells this key without the second "t".
    #[serde(rename = "quoationNote")]
    pub note: String,
    /// Salesperson code of the creating user.
    #[serde(rename = "quotationCreated")]
    pub created_by: String,
    pub items: Vec<DraftLine>,
}

/// Body of `PUT /v1/quotations/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotation {
    pub quotation_code: String,
    pub quotation_name: String,
    pub items: Vec<DraftLine>,
}

/// Body of `PUT /v1/quotations/update/{id}` (approve / reject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub quotation_status: QuotationStatus,
    pub approved_by: String,
    pub approval_reason: Option<String>,
    pub rejected_reason: Option<String>,
}

/// Body of `PUT /v1/quotations/submit/{id}` (submit / resubmit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitStatus {
    pub quotation_status: QuotationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_number_or_string() {
        let a: QuotationStatus = serde_json::from_str("3").unwrap();
        let b: QuotationStatus = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(a, QuotationStatus::Approved);
        assert_eq!(b, QuotationStatus::Resubmitted);
        assert!(serde_json::from_str::<QuotationStatus>("9").is_err());
        assert_eq!(serde_json::to_value(QuotationStatus::Rejected).unwrap(), 4);
    }

    #[test]
    fn test_list_tolerates_null_and_unknown_status() {
        let rows: Vec<QuotationSummary> = serde_json::from_str(
            r#"[
                {"quotation_code":"Q1","quotation_status":2},
                {"quotation_code":"Q2","quotation_status":null},
                {"quotation_code":"Q3","quotation_status":0},
                {"quotation_code":"Q4","quotation_status":"6"},
                {"quotation_code":"Q5"}
            ]"#,
        )
        .unwrap();
        let statuses: Vec<_> = rows.iter().map(|q| q.quotation_status).collect();
        assert_eq!(
            statuses,
            vec![
                QuotationStatus::PendingApproval,
                QuotationStatus::Saved,
                QuotationStatus::Saved,
                QuotationStatus::ReApproved,
                QuotationStatus::Saved
            ]
        );
    }

    #[test]
    fn test_status_groups() {
        assert!(QuotationStatus::ReApproved.is_final());
        assert!(QuotationStatus::Resubmitted.is_pending());
        assert!(!QuotationStatus::Saved.is_pending());
        assert_eq!(QuotationStatus::PendingApproval.label(), "Pending Approval");
    }

    #[test]
    fn test_summary_row() {
        let json = r#"{
            "quotation_id": 15,
            "quotation_code": "Q-0015",
            "quotation_name": "Network upgrade",
            "cus_name": "Acme",
            "quotation_date": "2024-06-03T00:00:00.000Z",
            "created_by": "SP01",
            "approved_by": null,
            "quotation_approved_date": null,
            "quotation_status": 2,
            "sp_code": "SP01",
            "total_quotation_amount": "1180.00"
        }"#;
        let row: QuotationSummary = serde_json::from_str(json).unwrap();
        assert_eq!(row.quotation_id, "15");
        assert_eq!(row.quotation_date, NaiveDate::from_ymd_opt(2024, 6, 3));
        assert_eq!(row.quotation_status, QuotationStatus::PendingApproval);
        assert_eq!(row.approved_by, "");
        assert_eq!(row.total_quotation_amount, 1180.0);
    }

    #[test]
    fn test_create_body_keys() {
        let body = CreateQuotation {
            quotation_name: "Q".to_string(),
            note: "n".to_string(),
            created_by: "SP01".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["quotationName"], "Q");
        assert_eq!(value["quoationNote"], "n");
        assert_eq!(value["quotationCreated"], "SP01");
    }

    #[test]
    fn test_status_update_body() {
        let body = StatusUpdate {
            quotation_status: QuotationStatus::Rejected,
            approved_by: "SP09".to_string(),
            approval_reason: None,
            rejected_reason: Some("Price too high".to_string()),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["quotation_status"], 4);
        assert!(value["approval_reason"].is_null());
        assert_eq!(value["rejected_reason"], "Price too high");
    }
}
