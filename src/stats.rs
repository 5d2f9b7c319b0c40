//! Dashboard figures derived from the aggregate endpoints.

use crate::models::{QuotationStatus, QuotationSummary, StatusCounts, WeeklyCount};

/// Dashboard grouping of the six statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Saved,
    Pending,
    Approved,
    Rejected,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Saved, Category::Pending, Category::Approved, Category::Rejected];

    pub fn of(status: QuotationStatus) -> Self {
        match status {
            QuotationStatus::Saved => Self::Saved,
            QuotationStatus::PendingApproval | QuotationStatus::Resubmitted => Self::Pending,
            QuotationStatus::Approved | QuotationStatus::ReApproved => Self::Approved,
            QuotationStatus::Rejected => Self::Rejected,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Saved => "Saved",
            Self::Pending => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// One dashboard card.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: Category,
    pub count: i64,
    /// `"12.50%"`, or `"0%"` when there are no quotations at all.
    pub percent: String,
}

/// Percentage of `part` in `total` with two decimals.
pub fn percent(part: i64, total: i64) -> String {
    if total <= 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", part as f64 / total as f64 * 100.0)
}

/// Cards in display order: Saved, Pending, Approved, Rejected.
pub fn breakdown(counts: &StatusCounts) -> Vec<CategoryShare> {
    let total = counts.total_count;
    Category::ALL
        .into_iter()
        .map(|category| {
            let count = match category {
                Category::Saved => counts.status_1_count,
                Category::Pending => counts.status_2_count + counts.status_5_count,
                Category::Approved => counts.status_3_count + counts.status_6_count,
                Category::Rejected => counts.status_4_count,
            };
            CategoryShare {
                category,
                count,
                percent: percent(count, total),
            }
        })
        .collect()
}

/// Quotations of `category`, original order kept.
pub fn in_category(quotations: &[QuotationSummary], category: Category) -> Vec<&QuotationSummary> {
    quotations
        .iter()
        .filter(|q| Category::of(q.quotation_status) == category)
        .collect()
}

/// `1 quotation`, `3 quotations`.
pub fn quotation_label(count: i64) -> String {
    if count == 1 {
        "1 quotation".to_string()
    } else {
        format!("{count} quotations")
    }
}

/// Weekly bars, highest count first; equal counts keep backend order.
pub fn weekly_chart(rows: &[WeeklyCount]) -> Vec<WeeklyCount> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.quotation_count.cmp(&a.quotation_count));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_groups_and_percentages() {
        let counts = StatusCounts {
            status_1_count: 2,
            status_2_count: 1,
            status_3_count: 3,
            status_4_count: 1,
            status_5_count: 1,
            status_6_count: 0,
            total_count: 8,
        };
        let cards = breakdown(&counts);
        let summary: Vec<_> = cards.iter().map(|c| (c.category, c.count, c.percent.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (Category::Saved, 2, "25.00%"),
                (Category::Pending, 2, "25.00%"),
                (Category::Approved, 3, "37.50%"),
                (Category::Rejected, 1, "12.50%"),
            ]
        );
    }

    #[test]
    fn test_zero_total() {
        let cards = breakdown(&StatusCounts::default());
        assert!(cards.iter().all(|c| c.percent == "0%"));
    }

    #[test]
    fn test_category_grouping() {
        let rows: Vec<QuotationSummary> = [
            QuotationStatus::Resubmitted,
            QuotationStatus::Saved,
            QuotationStatus::PendingApproval,
        ]
        .into_iter()
        .map(|s| QuotationSummary {
            quotation_status: s,
            ..Default::default()
        })
        .collect();
        let pending = in_category(&rows, Category::Pending);
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].quotation_status, QuotationStatus::Resubmitted);
    }

    #[test]
    fn test_weekly_sorted_desc() {
        let rows = vec![
            WeeklyCount {
                sales_p_name: "A".to_string(),
                quotation_count: 1,
            },
            WeeklyCount {
                sales_p_name: "B".to_string(),
                quotation_count: 4,
            },
            WeeklyCount {
                sales_p_name: "C".to_string(),
                quotation_count: 1,
            },
        ];
        let names: Vec<_> = weekly_chart(&rows).into_iter().map(|r| r.sales_p_name).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_quotation_label() {
        assert_eq!(quotation_label(1), "1 quotation");
        assert_eq!(quotation_label(0), "0 quotations");
        assert_eq!(quotation_label(5), "5 quotations");
    }
}
