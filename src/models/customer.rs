//! Customer record and form DTOs.

use serde::{Deserialize, Serialize};

/// Customer as returned by `GET /v1/customers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "super::de::integer")]
    pub cus_id: i64,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_name: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_addr: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub cus_vat_no: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub contact_person: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub contact_p_no: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub c_details: String,
}

/// Editable customer fields, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub customer_name: String,
    pub customer_address: String,
    pub vat_no: String,
    pub contact_person: String,
    pub contact_person_number: String,
    pub customer_details: String,
}

/// Body of `POST /v1/customers`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomer {
    #[serde(rename = "customerInfo")]
    pub customer_info: CustomerInfo,
    pub createdby: String,
}

/// Body of `PUT /v1/customers/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCustomer {
    #[serde(flatten)]
    pub customer: Customer,
    pub updated_by: String,
    pub updated_date: String,
}

impl CustomerInfo {
    /// Pre-fill the form from an existing record.
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_name: customer.cus_name.clone(),
            customer_address: customer.cus_addr.clone(),
            vat_no: customer.cus_vat_no.clone(),
            contact_person: customer.contact_person.clone(),
            contact_person_number: customer.contact_p_no.clone(),
            customer_details: customer.c_details.clone(),
        }
    }

    /// Merge the form onto `base`, keeping its identifiers.
    pub fn apply_to(&self, base: &Customer) -> Customer {
        Customer {
            cus_id: base.cus_id,
            cus_code: base.cus_code.clone(),
            cus_name: self.customer_name.trim().to_string(),
            cus_addr: self.customer_address.trim().to_string(),
            cus_vat_no: self.vat_no.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            contact_p_no: self.contact_person_number.trim().to_string(),
            c_details: self.customer_details.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_nulls() {
        let json = r#"{"cus_id":"12","cus_code":"C0012","cus_name":"Acme","cus_addr":null,"cus_vat_no":"1234","contact_person":"Nimal","contact_p_no":"0771234567","c_details":null}"#;
        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.cus_id, 12);
        assert_eq!(customer.cus_addr, "");
        assert_eq!(customer.contact_p_no, "0771234567");
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = CreateCustomer {
            customer_info: CustomerInfo {
                customer_name: "Acme".to_string(),
                ..Default::default()
            },
            createdby: "SP01".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["customerInfo"]["customerName"], "Acme");
        assert_eq!(value["customerInfo"]["contactPersonNumber"], "");
        assert_eq!(value["createdby"], "SP01");
    }

    #[test]
    fn test_apply_keeps_identifiers() {
        let base = Customer {
            cus_id: 4,
            cus_code: "C0004".to_string(),
            cus_name: "Old".to_string(),
            ..Default::default()
        };
        let mut form = CustomerInfo::from_customer(&base);
        form.customer_name = "  New Name ".to_string();
        let merged = form.apply_to(&base);
        assert_eq!(merged.cus_id, 4);
        assert_eq!(merged.cus_code, "C0004");
        assert_eq!(merged.cus_name, "New Name");
    }

    #[test]
    fn test_update_payload_is_flat() {
        let payload = UpdateCustomer {
            customer: Customer {
                cus_id: 4,
                ..Default::default()
            },
            updated_by: "SP01".to_string(),
            updated_date: "2024-05-01".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["cus_id"], 4);
        assert_eq!(value["updated_by"], "SP01");
    }
}
