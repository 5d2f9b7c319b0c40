//! Salesperson record and form DTOs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by a salesperson and by the session user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesPersonType {
    /// May approve, reject and manage the catalog.
    #[serde(rename = "A", alias = "a")]
    Approver,
    #[default]
    #[serde(rename = "M", alias = "m")]
    Member,
}

impl SalesPersonType {
    pub const ALL: [SalesPersonType; 2] = [SalesPersonType::Approver, SalesPersonType::Member];

    pub fn code(self) -> &'static str {
        match self {
            Self::Approver => "A",
            Self::Member => "M",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Approver => "Approver",
            Self::Member => "Member",
        }
    }

    pub fn is_approver(self) -> bool {
        self == Self::Approver
    }
}

impl fmt::Display for SalesPersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Salesperson as returned by `GET /v1/salespersons`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPerson {
    #[serde(deserialize_with = "super::de::id")]
    pub sales_p_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_email: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_contact_no: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_designation: String,
    #[serde(default, deserialize_with = "super::de::role")]
    pub sales_p_type: SalesPersonType,
}

/// Editable salesperson fields; also the body of `POST /v1/salespersons`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesPersonForm {
    pub sales_p_name: String,
    pub sales_p_email: String,
    pub sales_p_contact_no: String,
    pub sales_p_designation: String,
    pub sales_p_type: Option<SalesPersonType>,
}

impl SalesPersonForm {
    pub fn from_salesperson(sp: &SalesPerson) -> Self {
        Self {
            sales_p_name: sp.sales_p_name.clone(),
            sales_p_email: sp.sales_p_email.clone(),
            sales_p_contact_no: sp.sales_p_contact_no.clone(),
            sales_p_designation: sp.sales_p_designation.clone(),
            sales_p_type: Some(sp.sales_p_type),
        }
    }

    /// Build the record sent to `PUT /v1/salespersons/{code}`.
    pub fn apply_to(&self, code: &str) -> SalesPerson {
        SalesPerson {
            sales_p_code: code.to_string(),
            sales_p_name: self.sales_p_name.trim().to_string(),
            sales_p_email: self.sales_p_email.trim().to_string(),
            sales_p_contact_no: self.sales_p_contact_no.trim().to_string(),
            sales_p_designation: self.sales_p_designation.trim().to_string(),
            sales_p_type: self.sales_p_type.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes() {
        let sp: SalesPerson =
            serde_json::from_str(r#"{"sales_p_code":"SP02","sales_p_name":"Kamal","sales_p_type":"A"}"#).unwrap();
        assert!(sp.sales_p_type.is_approver());
        assert_eq!(serde_json::to_value(SalesPersonType::Member).unwrap(), "M");
    }

    #[test]
    fn test_missing_type_defaults_to_member() {
        let sp: SalesPerson = serde_json::from_str(r#"{"sales_p_code":"SP03"}"#).unwrap();
        assert_eq!(sp.sales_p_type, SalesPersonType::Member);
    }

    #[test]
    fn test_blank_or_unknown_type_reads_as_member() {
        let rows: Vec<SalesPerson> = serde_json::from_str(
            r#"[
                {"sales_p_code":"SP01","sales_p_type":"A"},
                {"sales_p_code":"SP02","sales_p_type":null},
                {"sales_p_code":"SP03","sales_p_type":""},
                {"sales_p_code":"SP04","sales_p_type":"Z"}
            ]"#,
        )
        .unwrap();
        let types: Vec<_> = rows.iter().map(|sp| sp.sales_p_type).collect();
        assert_eq!(
            types,
            vec![
                SalesPersonType::Approver,
                SalesPersonType::Member,
                SalesPersonType::Member,
                SalesPersonType::Member
            ]
        );
    }
}
