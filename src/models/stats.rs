//! Dashboard aggregate DTOs.

use super::QuotationSummary;
use serde::{Deserialize, Serialize};

/// Response of `GET /v1/quotations/counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCounts {
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_1_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_2_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_3_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_4_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_5_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub status_6_count: i64,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub total_count: i64,
}

/// Quotation of the current month, from `GET /v1/quotations/by-month`.
pub type MonthlyQuotation = QuotationSummary;

/// One bar of the weekly chart, from `GET /v1/quotations/weekly-count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCount {
    #[serde(default, deserialize_with = "super::de::text")]
    pub sales_p_name: String,
    #[serde(default, deserialize_with = "super::de::integer")]
    pub quotation_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_from_strings() {
        let json = r#"{"status_1_count":"3","status_2_count":1,"status_3_count":"0","total_count":"4"}"#;
        let counts: StatusCounts = serde_json::from_str(json).unwrap();
        assert_eq!(counts.status_1_count, 3);
        assert_eq!(counts.status_2_count, 1);
        assert_eq!(counts.status_6_count, 0);
        assert_eq!(counts.total_count, 4);
    }

    #[test]
    fn test_weekly_count_string() {
        let row: WeeklyCount = serde_json::from_str(r#"{"sales_p_name":"Kamal","quotation_count":"5"}"#).unwrap();
        assert_eq!(row.quotation_count, 5);
    }
}
