//! Catalog item record and form DTOs.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Catalog entry as returned by `GET /v1/items`.
///
/// Line items copy these fields when added to a quotation, so later catalog
/// edits never reach existing quotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "super::de::id")]
    pub item_code: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_name: String,
    #[serde(default, deserialize_with = "super::de::number")]
    pub item_vat: f64,
    #[serde(default, deserialize_with = "super::de::number")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_desc: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_price_validity: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_delivery: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_pay_terms: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_remarks: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_warranty: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_warranty_void: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_duties_taxes: String,
    #[serde(default, deserialize_with = "super::de::text")]
    pub item_stock_avail: String,
}

/// Editable item fields, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInfo {
    pub item_name: String,
    pub item_vat_no: String,
    pub unit_price: String,
    pub item_description: String,
    pub item_price_validity: String,
    pub item_delivery: String,
    pub item_pay_terms: String,
    pub item_remarks: String,
    pub item_warranty: String,
    pub item_warranty_void: String,
    pub item_taxes_and_duties: String,
    pub item_stock_availability: String,
}

/// Body of `POST /v1/items`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateItem {
    #[serde(rename = "itemInfo")]
    pub item_info: ItemInfo,
    pub createdby: String,
}

/// Body of `PUT /v1/items/{code}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateItem {
    #[serde(flatten)]
    pub item: Item,
    pub updated_by: String,
    pub updated_date: String,
}

impl ItemInfo {
    /// Pre-fill the form from an existing record.
    pub fn from_item(item: &Item) -> Self {
        Self {
            item_name: item.item_name.clone(),
            item_vat_no: item.item_vat.to_string(),
            unit_price: item.unit_price.to_string(),
            item_description: item.item_desc.clone(),
            item_price_validity: item.item_price_validity.clone(),
            item_delivery: item.item_delivery.clone(),
            item_pay_terms: item.item_pay_terms.clone(),
            item_remarks: item.item_remarks.clone(),
            item_warranty: item.item_warranty.clone(),
            item_warranty_void: item.item_warranty_void.clone(),
            item_taxes_and_duties: item.item_duties_taxes.clone(),
            item_stock_availability: item.item_stock_avail.clone(),
        }
    }

    /// Merge the form onto `base`, keeping its code.
    pub fn apply_to(&self, base: &Item) -> Result<Item> {
        let item_vat = self
            .item_vat_no
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::validation("VAT must be a number"))?;
        let unit_price = self
            .unit_price
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::validation("Unit price must be a number"))?;

        Ok(Item {
            item_code: base.item_code.clone(),
            item_name: self.item_name.trim().to_string(),
            item_vat,
            unit_price,
            item_desc: self.item_description.trim().to_string(),
            item_price_validity: self.item_price_validity.trim().to_string(),
            item_delivery: self.item_delivery.trim().to_string(),
            item_pay_terms: self.item_pay_terms.trim().to_string(),
            item_remarks: self.item_remarks.trim().to_string(),
            item_warranty: self.item_warranty.trim().to_string(),
            item_warranty_void: self.item_warranty_void.trim().to_string(),
            item_duties_taxes: self.item_taxes_and_duties.trim().to_string(),
            item_stock_avail: self.item_stock_availability.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_strings() {
        let json = r#"{"item_code":"IT-7","item_name":"Router","item_vat":"18.00","unit_price":"12500.50"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_vat, 18.0);
        assert_eq!(item.unit_price, 12500.5);
        assert_eq!(item.item_desc, "");
    }

    #[test]
    fn test_create_payload_field_names() {
        let payload = CreateItem {
            item_info: ItemInfo {
                item_taxes_and_duties: "Included".to_string(),
                item_stock_availability: "Ex-stock".to_string(),
                ..Default::default()
            },
            createdby: "SP01".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["itemInfo"]["itemTaxesAndDuties"], "Included");
        assert_eq!(value["itemInfo"]["itemStockAvailability"], "Ex-stock");
        assert_eq!(value["itemInfo"]["itemVatNo"], "");
    }

    #[test]
    fn test_apply_rejects_non_numeric() {
        let base = Item::default();
        let form = ItemInfo {
            item_vat_no: "abc".to_string(),
            unit_price: "10".to_string(),
            ..Default::default()
        };
        assert!(form.apply_to(&base).is_err());
    }

    #[test]
    fn test_form_roundtrip_keeps_code() {
        let base = Item {
            item_code: "IT-1".to_string(),
            item_name: "Switch".to_string(),
            item_vat: 18.0,
            unit_price: 4500.0,
            ..Default::default()
        };
        let merged = ItemInfo::from_item(&base).apply_to(&base).unwrap();
        assert_eq!(merged, base);
    }
}
