//! Client-side fuzzy search and the debounced search box behind it.

use crate::models::{Customer, Item, QuotationSummary, SalesPerson};
use std::borrow::Cow;
use std::time::{Duration, Instant};

/// Highest normalized edit distance still counted as a match.
pub const MATCH_THRESHOLD: f64 = 0.3;

/// Records that expose text fields to the fuzzy matcher.
pub trait Searchable {
    fn search_fields(&self) -> Vec<Cow<'_, str>>;
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(&self.cus_name)]
    }
}

impl Searchable for Item {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(&self.item_name)]
    }
}

impl Searchable for SalesPerson {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.sales_p_name),
            Cow::Borrowed(&self.sales_p_email),
            Cow::Borrowed(&self.sales_p_code),
            Cow::Borrowed(&self.sales_p_contact_no),
            Cow::Borrowed(&self.sales_p_designation),
            Cow::Borrowed(self.sales_p_type.label()),
        ]
    }
}

impl Searchable for QuotationSummary {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.quotation_name),
            Cow::Borrowed(&self.quotation_code),
            Cow::Borrowed(&self.cus_name),
            Cow::Borrowed(&self.created_by),
            Cow::Borrowed(&self.approved_by),
            Cow::Owned(self.quotation_status.code().to_string()),
        ]
    }
}

/// Smallest edit distance between `pattern` and any substring of `text`,
/// divided by the pattern length. `0.0` is an exact substring match.
///
/// Both inputs are expected lowercased already.
pub fn substring_score(pattern: &[char], text: &[char]) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }

    // Column-wise DP where the first row is all zeros so a match may start anywhere.
    let m = pattern.len();
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = column[m];

    for &tc in text {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let above = column[i];
            let cost = usize::from(pattern[i - 1] != tc);
            column[i] = (diagonal + cost).min(above + 1).min(column[i - 1] + 1);
            diagonal = above;
        }
        best = best.min(column[m]);
    }

    best as f64 / m as f64
}

/// Indices of matching records, best score first; ties keep collection order.
///
/// A blank query matches everything in original order.
pub fn fuzzy_rank<T: Searchable>(items: &[T], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let pattern: Vec<char> = query.to_lowercase().chars().collect();
    let mut scored: Vec<(usize, f64)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            item.search_fields()
                .iter()
                .filter(|field| !field.is_empty())
                .map(|field| {
                    let text: Vec<char> = field.to_lowercase().chars().collect();
                    substring_score(&pattern, &text)
                })
                .min_by(f64::total_cmp)
                .filter(|score| *score <= MATCH_THRESHOLD)
                .map(|score| (index, score))
        })
        .collect();

    // Stable sort keeps original order among equal scores.
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().map(|(index, _)| index).collect()
}

/// Matching records, best first.
pub fn fuzzy_filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    fuzzy_rank(items, query).into_iter().map(|i| &items[i]).collect()
}

/// Plain case-insensitive substring test used by the reports.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Holds the latest search text until the input has been quiet for `delay`.
///
/// Every `push` restarts the timer, so only the last value is released.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a keystroke at `now`.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.delay));
    }

    /// Release the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if due {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Drop the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending value is released.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuotationStatus, SalesPersonType};

    fn customer(name: &str) -> Customer {
        Customer {
            cus_name: name.to_string(),
            ..Default::default()
        }
    }

    fn score(pattern: &str, text: &str) -> f64 {
        let p: Vec<char> = pattern.chars().collect();
        let t: Vec<char> = text.chars().collect();
        substring_score(&p, &t)
    }

    #[test]
    fn test_substring_score() {
        assert_eq!(score("acme", "the acme company"), 0.0);
        assert_eq!(score("acme", "the acne company"), 0.25);
        assert_eq!(score("abc", ""), 1.0);
        assert_eq!(score("", "anything"), 0.0);
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let items = vec![customer("Zeta"), customer("Alpha"), customer("Mid")];
        assert_eq!(fuzzy_rank(&items, ""), vec![0, 1, 2]);
        assert_eq!(fuzzy_rank(&items, "   "), vec![0, 1, 2]);
    }

    #[test]
    fn test_typo_tolerance() {
        let items = vec![customer("Dialog Axiata"), customer("Hayleys"), customer("John Keells")];
        let found: Vec<_> = fuzzy_filter(&items, "dialg").into_iter().map(|c| c.cus_name.as_str()).collect();
        assert_eq!(found, vec!["Dialog Axiata"]);
        assert!(fuzzy_filter(&items, "xyzzy").is_empty());
    }

    #[test]
    fn test_ranked_by_score_then_order() {
        let items = vec![customer("Acne Labs"), customer("Acme Corp"), customer("Acme Stores")];
        // "Acme Corp" and "Acme Stores" are exact (tie, original order), "Acne" is one edit away.
        assert_eq!(fuzzy_rank(&items, "ACME"), vec![1, 2, 0]);
    }

    #[test]
    fn test_salesperson_fields() {
        let sp = SalesPerson {
            sales_p_code: "SP10".to_string(),
            sales_p_name: "Nuwan".to_string(),
            sales_p_email: "nuwan@ewis.lk".to_string(),
            sales_p_type: SalesPersonType::Approver,
            ..Default::default()
        };
        let items = vec![sp];
        assert_eq!(fuzzy_rank(&items, "sp10"), vec![0]);
        assert_eq!(fuzzy_rank(&items, "approver"), vec![0]);
    }

    #[test]
    fn test_quotation_status_number() {
        let q = QuotationSummary {
            quotation_name: "Firewall".to_string(),
            quotation_status: QuotationStatus::Rejected,
            ..Default::default()
        };
        assert_eq!(fuzzy_rank(&[q], "4"), vec![0]);
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Acme Corp", "corp"));
        assert!(contains_ci("anything", ""));
        assert!(!contains_ci("Acme", "acne"));
    }

    #[test]
    fn test_debounce_last_write_wins() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(250));

        debouncer.push("a", start);
        debouncer.push("ab", start + Duration::from_millis(100));
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(350)), Some("ab".to_string()));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_debounce_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.push("query", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }
}
