//! Wire models for customers, items, salespersons, quotations and the session user.

pub mod company;
pub mod customer;
pub mod item;
pub mod quotation;
pub mod salesperson;
pub mod stats;
pub mod user;

pub use company::Company;
pub use customer::{CreateCustomer, Customer, CustomerInfo, UpdateCustomer};
pub use item::{CreateItem, Item, ItemInfo, UpdateItem};
pub use quotation::{
    CreateQuotation, DraftLine, QuotationDetailRow, QuotationStatus, QuotationSummary, StatusUpdate,
    SubmitStatus, UpdateQuotation,
};
pub use salesperson::{SalesPerson, SalesPersonForm, SalesPersonType};
pub use stats::{MonthlyQuotation, StatusCounts, WeeklyCount};
pub use user::{ChangePasswordRequest, LoginForm, LoginRequest, LoginResponse, PasswordForm, User};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Generic `{ success, message }` body returned by mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// A body without `success` counts as accepted.
impl Default for ApiMessage {
    fn default() -> Self {
        Self {
            success: default_success(),
            message: None,
        }
    }
}

/// Parse a backend date in any of the shapes it emits.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok()
}

/// Serde helpers for loosely typed backend columns.
pub mod de {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    /// Decimal column sent as a number or a numeric string.
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrString>::deserialize(deserializer)? {
            None => Ok(0.0),
            Some(NumberOrString::Number(n)) => Ok(n),
            Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(0.0),
            Some(NumberOrString::Text(s)) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid number '{s}'"))),
        }
    }

    /// Integer column sent as a number or a numeric string.
    pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = number(deserializer)?;
        Ok(value.round() as i64)
    }

    /// Optional date column in any supported shape.
    pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }

    /// Text column that may be `null`.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Identifier sent as a number or a string, kept as a string.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => Ok(String::new()),
            Some(serde_json::Value::String(s)) => Ok(s),
            Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(D::Error::custom(format!("unexpected identifier {other}"))),
        }
    }

    /// Quotation status column. `null` or an unknown code reads as Saved.
    pub fn status<'de, D>(deserializer: D) -> Result<QuotationStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        let code = match &raw {
            None | Some(serde_json::Value::Null) => return Ok(QuotationStatus::default()),
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            Some(_) => None,
        };
        Ok(code.and_then(QuotationStatus::from_code).unwrap_or_else(|| {
            tracing::warn!("Unknown quotation status {:?}, treating as Saved", raw);
            QuotationStatus::default()
        }))
    }

    /// Optional salesperson role. Empty reads as absent; anything but `A` is a member.
    pub fn optional_role<'de, D>(deserializer: D) -> Result<Option<SalesPersonType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => return Ok(None),
            Some(serde_json::Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        };
        Ok(match raw.as_str() {
            "" => None,
            "A" | "a" => Some(SalesPersonType::Approver),
            "M" | "m" => Some(SalesPersonType::Member),
            other => {
                tracing::warn!("Unknown salesperson type '{}', treating as Member", other);
                Some(SalesPersonType::Member)
            }
        })
    }

    /// Salesperson role column; missing or unknown reads as Member.
    pub fn role<'de, D>(deserializer: D) -> Result<SalesPersonType, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(optional_role(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(parse_date("2024-03-07"), Some(expected));
        assert_eq!(parse_date("2024-03-07 14:22:01"), Some(expected));
        assert_eq!(parse_date("2024-03-07T14:22:01.000Z"), Some(expected));
        assert_eq!(parse_date("2024-03-07T14:22:01"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_api_message_defaults() {
        let msg: ApiMessage = serde_json::from_str("{}").unwrap();
        assert!(msg.success);
        assert!(msg.message.is_none());

        let msg: ApiMessage = serde_json::from_str(r#"{"success":false,"message":"Duplicate"}"#).unwrap();
        assert!(!msg.success);
        assert_eq!(msg.message.as_deref(), Some("Duplicate"));
    }
}
