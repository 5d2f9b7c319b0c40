//! Form validation.
//!
//! Each form implements [`Validate`]; a non-empty [`FieldErrors`] blocks the
//! request before it reaches the network.

use crate::models::{CustomerInfo, ItemInfo, LoginForm, PasswordForm, SalesPersonForm};
use crate::quote::{QuotationDraft, QuotationEditor};
use std::collections::BTreeMap;

/// Field name -> message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message; the first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Record the outcome of a single rule.
    pub fn check(&mut self, field: &'static str, rule: Result<(), String>) {
        if let Err(message) = rule {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// First message, for single-line summaries.
    pub fn first(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }
}

/// Declarative validation of a form.
pub trait Validate {
    fn validate(&self) -> FieldErrors;
}

// ============================================================================
// Rules
// ============================================================================

pub fn required(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

/// Between `min` and `max` ASCII digits, nothing else.
pub fn digits_between(value: &str, min: usize, max: usize) -> bool {
    let value = value.trim();
    (min..=max).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

/// `a@b.c` shape: no whitespace, one `@`, a dot in the domain part.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Non-negative number with at most two decimals (`15`, `15.5`, `15.00`).
pub fn is_decimal_2dp(value: &str) -> bool {
    let value = value.trim();
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (value, None),
    };
    let whole_ok = !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit());
    let fraction_ok = fraction.is_none_or(|f| (1..=2).contains(&f.len()) && f.chars().all(|c| c.is_ascii_digit()));
    whole_ok && fraction_ok
}

/// At least 8 characters with a letter and a digit.
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= 8
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
}

// ============================================================================
// Forms
// ============================================================================

impl Validate for CustomerInfo {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("customer_name", required(&self.customer_name, "Customer Name"));
        errors.check("customer_address", required(&self.customer_address, "Customer Address"));
        errors.check("vat_no", required(&self.vat_no, "Customer VAT Number"));
        errors.check("contact_person", required(&self.contact_person, "Contact Person"));
        errors.check(
            "contact_person_number",
            required(&self.contact_person_number, "Contact Person Number"),
        );
        errors.check("customer_details", required(&self.customer_details, "Customer Details"));

        if !self.vat_no.trim().is_empty() && !digits_between(&self.vat_no, 1, 20) {
            errors.add("vat_no", "Customer VAT No must be 1 to 20 digits");
        }
        if !self.contact_person_number.trim().is_empty() && !digits_between(&self.contact_person_number, 10, 10) {
            errors.add("contact_person_number", "Contact Person Number must be exactly 10 digits");
        }
        errors
    }
}

impl Validate for ItemInfo {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("item_name", required(&self.item_name, "Item Name"));
        errors.check("item_vat_no", required(&self.item_vat_no, "Item VAT"));
        errors.check("unit_price", required(&self.unit_price, "Unit Price"));
        errors.check("item_price_validity", required(&self.item_price_validity, "Item Price Validity"));
        errors.check("item_delivery", required(&self.item_delivery, "Item Delivery"));
        errors.check("item_pay_terms", required(&self.item_pay_terms, "Item Pay Terms"));
        errors.check("item_remarks", required(&self.item_remarks, "Item Remarks"));
        errors.check("item_warranty", required(&self.item_warranty, "Item Warranty"));
        errors.check("item_warranty_void", required(&self.item_warranty_void, "Item Warranty Void"));
        errors.check(
            "item_taxes_and_duties",
            required(&self.item_taxes_and_duties, "Item Taxes and Duties"),
        );
        errors.check(
            "item_stock_availability",
            required(&self.item_stock_availability, "Item Stock Availability"),
        );

        if !self.item_vat_no.trim().is_empty() && !is_decimal_2dp(&self.item_vat_no) {
            errors.add("item_vat_no", "Item VAT must be a number (e.g., 15 or 15.00)");
        }
        if !self.unit_price.trim().is_empty() && !is_decimal_2dp(&self.unit_price) {
            errors.add("unit_price", "Enter a valid price (e.g., 12.34)");
        }
        errors
    }
}

impl Validate for SalesPersonForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("sales_p_name", required(&self.sales_p_name, "Sales Person Name"));
        errors.check("sales_p_email", required(&self.sales_p_email, "Sales Person Email"));
        if !self.sales_p_email.trim().is_empty() && !is_email(&self.sales_p_email) {
            errors.add("sales_p_email", "Invalid email address");
        }
        errors.check("sales_p_contact_no", required(&self.sales_p_contact_no, "Contact Number"));
        if !self.sales_p_contact_no.trim().is_empty() && !digits_between(&self.sales_p_contact_no, 10, 10) {
            errors.add("sales_p_contact_no", "Contact Number must be exactly 10 digits");
        }
        errors.check("sales_p_designation", required(&self.sales_p_designation, "Designation"));
        if self.sales_p_type.is_none() {
            errors.add("sales_p_type", "Sales Person Type is required");
        }
        errors
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            errors.add("credentials", "Username and password are required.");
        }
        errors
    }
}

impl Validate for PasswordForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("old_password", required(&self.old_password, "Old password"));

        if self.new_password.trim().is_empty() {
            errors.add("new_password", "New password is required");
        } else if self.new_password == self.old_password {
            errors.add("new_password", "New password must be different from old password");
        } else if !is_strong_password(&self.new_password) {
            errors.add("new_password", "At least 8 chars, include a letter and a number");
        }

        if self.confirm_password.trim().is_empty() {
            errors.add("confirm_password", "Please confirm your new password");
        } else if self.confirm_password != self.new_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        errors
    }
}

impl Validate for QuotationDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("quotation_name", required(&self.name, "Quotation Name"));
        if self.customer.as_deref().is_none_or(str::is_empty) {
            errors.add("customer", "Customer is required");
        }
        if self.salesperson.as_deref().is_none_or(str::is_empty) {
            errors.add("salesperson", "Sales Person is required");
        }
        if self.company.as_deref().is_none_or(str::is_empty) {
            errors.add("company", "Company is required");
        }
        if self.lines().is_empty() {
            errors.add("items", "At least one item is required");
        }
        errors
    }
}

impl Validate for QuotationEditor {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("quotation_name", required(&self.name, "Quotation Name"));
        if self.lines().is_empty() {
            errors.add("items", "At least one item is required");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, SalesPersonType};

    fn valid_customer() -> CustomerInfo {
        CustomerInfo {
            customer_name: "Acme".to_string(),
            customer_address: "12 Galle Road, Colombo".to_string(),
            vat_no: "114455667".to_string(),
            contact_person: "Nimal".to_string(),
            contact_person_number: "0771234567".to_string(),
            customer_details: "Key account".to_string(),
        }
    }

    #[test]
    fn test_rules() {
        assert!(digits_between("1", 1, 20));
        assert!(!digits_between("12a", 1, 20));
        assert!(!digits_between("123456789012345678901", 1, 20));
        assert!(is_email("a@b.c"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.d"));
        assert!(!is_email("@b.c"));
        assert!(is_decimal_2dp("15"));
        assert!(is_decimal_2dp("15.00"));
        assert!(!is_decimal_2dp("15.123"));
        assert!(!is_decimal_2dp("15."));
        assert!(!is_decimal_2dp("-1"));
        assert!(is_strong_password("abcdefg1"));
        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("abc1"));
    }

    #[test]
    fn test_customer_valid() {
        assert!(valid_customer().validate().is_empty());
    }

    #[test]
    fn test_customer_errors() {
        let mut form = valid_customer();
        form.vat_no = "12-34".to_string();
        form.contact_person_number = "07712".to_string();
        form.customer_details.clear();

        let errors = form.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("vat_no"), Some("Customer VAT No must be 1 to 20 digits"));
        assert_eq!(
            errors.get("contact_person_number"),
            Some("Contact Person Number must be exactly 10 digits")
        );
        assert_eq!(errors.get("customer_details"), Some("Customer Details is required"));
    }

    #[test]
    fn test_item_description_optional() {
        let form = ItemInfo {
            item_name: "Router".to_string(),
            item_vat_no: "18".to_string(),
            unit_price: "12500.50".to_string(),
            item_price_validity: "30 days".to_string(),
            item_delivery: "2 weeks".to_string(),
            item_pay_terms: "Cash".to_string(),
            item_remarks: "-".to_string(),
            item_warranty: "1 year".to_string(),
            item_warranty_void: "Physical damage".to_string(),
            item_taxes_and_duties: "Included".to_string(),
            item_stock_availability: "Ex-stock".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_empty());

        let mut bad = form.clone();
        bad.unit_price = "12.345".to_string();
        assert_eq!(bad.validate().get("unit_price"), Some("Enter a valid price (e.g., 12.34)"));
    }

    #[test]
    fn test_salesperson_type_required() {
        let form = SalesPersonForm {
            sales_p_name: "Kamal".to_string(),
            sales_p_email: "kamal@ewis.lk".to_string(),
            sales_p_contact_no: "0711234567".to_string(),
            sales_p_designation: "Sales Executive".to_string(),
            sales_p_type: None,
        };
        assert_eq!(form.validate().get("sales_p_type"), Some("Sales Person Type is required"));

        let form = SalesPersonForm {
            sales_p_type: Some(SalesPersonType::Member),
            ..form
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_login_required() {
        let form = LoginForm {
            username: "admin".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate().first(), Some("Username and password are required."));
    }

    #[test]
    fn test_password_rules() {
        let form = PasswordForm {
            old_password: "oldpass12".to_string(),
            new_password: "oldpass12".to_string(),
            confirm_password: "oldpass12".to_string(),
        };
        assert_eq!(
            form.validate().get("new_password"),
            Some("New password must be different from old password")
        );

        let form = PasswordForm {
            old_password: "oldpass12".to_string(),
            new_password: "newpass34".to_string(),
            confirm_password: "newpass35".to_string(),
        };
        let errors = form.validate();
        assert!(errors.get("new_password").is_none());
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));
    }

    #[test]
    fn test_draft_requires_items_and_header() {
        let mut draft = QuotationDraft::new();
        let errors = draft.validate();
        for field in ["quotation_name", "customer", "salesperson", "company", "items"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }

        draft.name = "Q".to_string();
        draft.customer = Some("C1".to_string());
        draft.salesperson = Some("SP1".to_string());
        draft.company = Some("1".to_string());
        draft
            .add_catalog_item(&Item {
                item_code: "IT-1".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(draft.validate().is_empty());
    }
}
