//! Line-item arithmetic and amount formatting.

use thiserror::Error;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 1000;
pub const MAX_UNIT_PRICE: f64 = 9_999_999.0;
pub const MAX_VAT: f64 = 100.0;

/// Shown instead of an amount when the unit price is zero.
pub const FREE_OF_CHARGE: &str = "FOC";

/// Rejected edit of a single field. The previous value stays in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{title}: {message}")]
pub struct FieldError {
    /// Dialog title, e.g. "Invalid Quantity".
    pub title: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
        }
    }
}

/// Any finite decimal literal, so exponent forms such as `1e3` are accepted.
fn parse_number(input: &str, title: &'static str) -> Result<f64, FieldError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| FieldError::new(title, "Must be a number"))?;
    if !value.is_finite() {
        return Err(FieldError::new(title, "Must be a number"));
    }
    Ok(value)
}

/// Quantity: whole number in `1..=1000`.
pub fn parse_quantity(input: &str) -> Result<u32, FieldError> {
    const TITLE: &str = "Invalid Quantity";
    let value = parse_number(input, TITLE)?;
    if value < MIN_QUANTITY as f64 {
        return Err(FieldError::new(TITLE, "Must be a positive number"));
    }
    if value > MAX_QUANTITY as f64 {
        return Err(FieldError::new(TITLE, format!("Cannot exceed {MAX_QUANTITY}")));
    }
    if value.fract() != 0.0 {
        return Err(FieldError::new(TITLE, "Must be a whole number"));
    }
    Ok(value as u32)
}

/// Unit price: `0..=9,999,999`. Zero means free of charge.
pub fn parse_unit_price(input: &str) -> Result<f64, FieldError> {
    const TITLE: &str = "Invalid Unit Price";
    let value = parse_number(input, TITLE)?;
    if value < 0.0 {
        return Err(FieldError::new(TITLE, "Must be non-negative"));
    }
    if value > MAX_UNIT_PRICE {
        return Err(FieldError::new(TITLE, format!("Cannot exceed {}", format_amount(MAX_UNIT_PRICE))));
    }
    Ok(value)
}

/// VAT percentage: `0..=100`.
pub fn parse_vat(input: &str) -> Result<f64, FieldError> {
    const TITLE: &str = "Invalid VAT";
    let value = parse_number(input, TITLE)?;
    if value < 0.0 {
        return Err(FieldError::new(TITLE, "Must be non-negative"));
    }
    if value > MAX_VAT {
        return Err(FieldError::new(TITLE, "Cannot exceed 100"));
    }
    Ok(value)
}

/// Derived amounts for one line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAmounts {
    pub unit_price: f64,
    /// `unit_price * quantity`
    pub subtotal: f64,
    /// `unit_price * (1 + vat / 100)`
    pub unit_price_incl_vat: f64,
    /// `unit_price_incl_vat * quantity`
    pub total_incl_vat: f64,
}

impl LineAmounts {
    pub fn compute(unit_price: f64, vat_percent: f64, quantity: u32) -> Self {
        let quantity = quantity as f64;
        let unit_price_incl_vat = unit_price * (1.0 + vat_percent / 100.0);
        Self {
            unit_price,
            subtotal: unit_price * quantity,
            unit_price_incl_vat,
            total_incl_vat: unit_price_incl_vat * quantity,
        }
    }

    pub fn is_free_of_charge(&self) -> bool {
        self.unit_price == 0.0
    }
}

/// Sum of line totals including VAT.
pub fn grand_total(lines: impl IntoIterator<Item = LineAmounts>) -> f64 {
    lines.into_iter().map(|l| l.total_incl_vat).sum()
}

/// `1234.5` -> `"1,234.50"`.
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction:02}")
}

/// Amount for a price column of a line: `FOC` when the line is free.
pub fn display_price(amounts: &LineAmounts, value: f64) -> String {
    if amounts.is_free_of_charge() {
        FREE_OF_CHARGE.to_string()
    } else {
        format_amount(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234.5), "1,234.50");
        assert_eq!(format_amount(9_999_999.0), "9,999,999.00");
        assert_eq!(format_amount(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(parse_quantity("1"), Ok(1));
        assert_eq!(parse_quantity(" 1000 "), Ok(1000));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("1001").is_err());
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn test_exponent_input_is_a_number() {
        assert_eq!(parse_quantity("1e3"), Ok(1000));
        assert_eq!(parse_quantity("+5"), Ok(5));
        assert!(parse_quantity("1e4").is_err());
        assert!(parse_quantity("inf").is_err());
        assert_eq!(parse_unit_price("2.5e2"), Ok(250.0));
    }

    #[test]
    fn test_line_amounts_at_range_corners() {
        // (unit price, vat, quantity, total incl. VAT)
        let cases = [
            (0.0, 0.0, 1, 0.0),
            (0.0, 100.0, 1000, 0.0),
            (MAX_UNIT_PRICE, 0.0, 1, 9_999_999.0),
            (MAX_UNIT_PRICE, 100.0, 1, 19_999_998.0),
            (MAX_UNIT_PRICE, 0.0, MAX_QUANTITY, 9_999_999_000.0),
            (MAX_UNIT_PRICE, 100.0, MAX_QUANTITY, 19_999_998_000.0),
            (0.01, 100.0, MIN_QUANTITY, 0.02),
            (1.0, 0.0, MAX_QUANTITY, 1000.0),
        ];
        for (price, vat, qty, expected) in cases {
            let amounts = LineAmounts::compute(price, vat, qty);
            assert!(
                (amounts.total_incl_vat - expected).abs() < 1e-6,
                "price {price} vat {vat} qty {qty}: {}",
                amounts.total_incl_vat
            );
            assert!((amounts.subtotal - price * qty as f64).abs() < 1e-6);
            assert_eq!(amounts.is_free_of_charge(), price == 0.0);
        }

        let free = LineAmounts::compute(0.0, 100.0, 1);
        assert_eq!(display_price(&free, free.total_incl_vat), "FOC");
        let top = LineAmounts::compute(MAX_UNIT_PRICE, 100.0, MAX_QUANTITY);
        assert_eq!(display_price(&top, top.total_incl_vat), "19,999,998,000.00");
    }

    #[test]
    fn test_price_and_vat_bounds() {
        assert_eq!(parse_unit_price("0"), Ok(0.0));
        assert_eq!(parse_unit_price("9999999"), Ok(9_999_999.0));
        assert!(parse_unit_price("10000000").is_err());
        assert!(parse_unit_price("-1").is_err());

        assert_eq!(parse_vat("18"), Ok(18.0));
        assert!(parse_vat("100.01").is_err());
        assert!(parse_vat("-0.5").is_err());
        assert!(parse_vat("NaN").is_err());
    }

    #[test]
    fn test_line_amounts() {
        let amounts = LineAmounts::compute(100.0, 10.0, 2);
        assert_eq!(amounts.subtotal, 200.0);
        assert!((amounts.unit_price_incl_vat - 110.0).abs() < 1e-9);
        assert!((amounts.total_incl_vat - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_foc_display() {
        let free = LineAmounts::compute(0.0, 18.0, 7);
        assert_eq!(display_price(&free, free.total_incl_vat), "FOC");
        assert_eq!(display_price(&free, free.subtotal), "FOC");

        let paid = LineAmounts::compute(50.0, 0.0, 3);
        assert_eq!(display_price(&paid, paid.subtotal), "150.00");
    }

    #[test]
    fn test_grand_total() {
        let total = grand_total([LineAmounts::compute(100.0, 10.0, 2), LineAmounts::compute(0.0, 0.0, 5)]);
        assert_eq!(format_amount(total), "220.00");
    }
}
