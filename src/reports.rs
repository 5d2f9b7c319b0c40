//! Read-only report projections over customers and quotations.

use crate::models::{Customer, QuotationStatus, QuotationSummary};
use crate::search::contains_ci;
use chrono::NaiveDate;

/// `2024-06-03` -> `June 3, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Customers whose name contains `query` (case-insensitive).
pub fn filter_customers<'a>(customers: &'a [Customer], query: &str) -> Vec<&'a Customer> {
    customers.iter().filter(|c| contains_ci(&c.cus_name, query)).collect()
}

/// Filter state of the quotation report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationReportFilter {
    pub search: String,
    /// Inclusive lower bound on the created date.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on the created date (the whole day counts).
    pub end: Option<NaiveDate>,
    /// Salesperson code.
    pub salesperson: Option<String>,
}

impl QuotationReportFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.start.is_none() && self.end.is_none() && self.salesperson.is_none()
    }

    fn search_hit(&self, q: &QuotationSummary) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        [
            q.quotation_code.as_str(),
            q.quotation_name.as_str(),
            q.cus_name.as_str(),
            q.created_by.as_str(),
            q.approved_by.as_str(),
        ]
        .into_iter()
        .any(|field| contains_ci(field, term))
            || contains_ci(&q.quotation_status.code().to_string(), term)
            || q.quotation_date.is_some_and(|d| contains_ci(&format_long_date(d), term))
            || q.quotation_approved_date.is_some_and(|d| contains_ci(&format_long_date(d), term))
    }

    /// Records without a created date only pass when no bound is set.
    fn date_hit(&self, q: &QuotationSummary) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(date) = q.quotation_date else {
            return false;
        };
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    fn salesperson_hit(&self, q: &QuotationSummary) -> bool {
        match &self.salesperson {
            Some(code) => !q.sp_code.is_empty() && q.sp_code == *code,
            None => true,
        }
    }

    pub fn matches(&self, q: &QuotationSummary) -> bool {
        self.search_hit(q) && self.date_hit(q) && self.salesperson_hit(q)
    }

    pub fn apply<'a>(&self, quotations: &'a [QuotationSummary]) -> Vec<&'a QuotationSummary> {
        quotations.iter().filter(|q| self.matches(q)).collect()
    }
}

/// Summary block of the quotation report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: usize,
    /// Approved or re-approved.
    pub approved: usize,
    /// Awaiting first approval only; resubmissions are not counted.
    pub pending: usize,
}

impl ReportSummary {
    pub fn of(rows: &[&QuotationSummary]) -> Self {
        Self {
            total: rows.len(),
            approved: rows.iter().filter(|q| q.quotation_status.is_final()).count(),
            pending: rows
                .iter()
                .filter(|q| q.quotation_status == QuotationStatus::PendingApproval)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotation(code: &str, date: Option<(i32, u32, u32)>, status: QuotationStatus, sp: &str) -> QuotationSummary {
        QuotationSummary {
            quotation_code: code.to_string(),
            quotation_name: format!("Quote {code}"),
            cus_name: "Acme".to_string(),
            quotation_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            quotation_status: status,
            sp_code: sp.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<QuotationSummary> {
        vec![
            quotation("Q1", Some((2024, 6, 1)), QuotationStatus::Approved, "SP01"),
            quotation("Q2", Some((2024, 6, 15)), QuotationStatus::PendingApproval, "SP02"),
            quotation("Q3", Some((2024, 6, 30)), QuotationStatus::Resubmitted, "SP01"),
            quotation("Q4", None, QuotationStatus::ReApproved, "SP02"),
        ]
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(format_long_date(date), "June 3, 2024");
    }

    #[test]
    fn test_inclusive_range() {
        let data = sample();
        let filter = QuotationReportFilter {
            start: NaiveDate::from_ymd_opt(2024, 6, 1),
            end: NaiveDate::from_ymd_opt(2024, 6, 15),
            ..Default::default()
        };
        let codes: Vec<_> = filter.apply(&data).iter().map(|q| q.quotation_code.as_str()).collect();
        assert_eq!(codes, vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_undated_only_without_bounds() {
        let data = sample();
        assert_eq!(QuotationReportFilter::default().apply(&data).len(), 4);

        let filter = QuotationReportFilter {
            end: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        assert_eq!(filter.apply(&data).len(), 3);
    }

    #[test]
    fn test_salesperson_and_search() {
        let data = sample();
        let filter = QuotationReportFilter {
            salesperson: Some("SP01".to_string()),
            search: "june 30".to_string(),
            ..Default::default()
        };
        let codes: Vec<_> = filter.apply(&data).iter().map(|q| q.quotation_code.as_str()).collect();
        assert_eq!(codes, vec!["Q3"]);
    }

    #[test]
    fn test_summary_counts() {
        let data = sample();
        let rows: Vec<_> = data.iter().collect();
        let summary = ReportSummary::of(&rows);
        assert_eq!(
            summary,
            ReportSummary {
                total: 4,
                approved: 2,
                pending: 1
            }
        );
    }

    #[test]
    fn test_customer_filter() {
        let customers = vec![
            Customer {
                cus_name: "Acme Holdings".to_string(),
                ..Default::default()
            },
            Customer {
                cus_name: "Zenith".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(filter_customers(&customers, "HOLD").len(), 1);
        assert_eq!(filter_customers(&customers, "").len(), 2);
    }
}
