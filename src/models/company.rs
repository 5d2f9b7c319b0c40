//! Company lookup used when creating quotations.

use serde::{Deserialize, Serialize};

/// Issuing company, referenced by id from a quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "idcompany", deserialize_with = "super::de::id")]
    pub id: String,
    #[serde(rename = "company_name", default, deserialize_with = "super::de::text")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id() {
        let company: Company = serde_json::from_str(r#"{"idcompany":2,"company_name":"EWIS Peripherals"}"#).unwrap();
        assert_eq!(company.id, "2");
        assert_eq!(company.name, "EWIS Peripherals");
    }
}
