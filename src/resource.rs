//! In-memory collection behind each list panel.
//!
//! Holds the fetched records, the debounced search box, the single-record
//! edit lock and the post-mutation reconciliation rule.

use crate::error::{AppError, Result};
use crate::models::{Customer, Item, QuotationSummary, SalesPerson};
use crate::search::{self, Debouncer, Searchable};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// A record addressable by a stable identifier.
pub trait Record: Clone {
    type Key: Clone + PartialEq + Debug;

    fn key(&self) -> Self::Key;
}

impl Record for Customer {
    type Key = i64;

    fn key(&self) -> i64 {
        self.cus_id
    }
}

impl Record for Item {
    type Key = String;

    fn key(&self) -> String {
        self.item_code.clone()
    }
}

impl Record for SalesPerson {
    type Key = String;

    fn key(&self) -> String {
        self.sales_p_code.clone()
    }
}

impl Record for QuotationSummary {
    type Key = String;

    fn key(&self) -> String {
        self.quotation_code.clone()
    }
}

/// A mutation the backend has accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T: Record> {
    Created,
    Updated(T),
    Deleted(T::Key),
}

/// What the caller has to do after `reconcile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Reload the collection to pick up server-assigned identifiers.
    RefetchRequired,
    /// The local collection already reflects the change.
    Patched,
}

/// Records of one resource plus its list-view state.
#[derive(Debug, Clone)]
pub struct ResourceList<T: Record> {
    items: Vec<T>,
    loading: bool,
    editing: Option<T::Key>,
    /// Text currently in the search box.
    pub query: String,
    applied_query: String,
    debouncer: Debouncer,
}

impl<T: Record> Default for ResourceList<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}

impl<T: Record> ResourceList<T> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            editing: None,
            query: String::new(),
            applied_query: String::new(),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|r| &r.key() == key)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replace the collection with a fresh fetch.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
    }

    // ---------------------------------------------------------------------
    // Edit lock
    // ---------------------------------------------------------------------

    /// Lock the list on `key`. Fails while another record is being edited.
    pub fn begin_edit(&mut self, key: T::Key) -> Result<()> {
        match &self.editing {
            Some(current) if *current != key => Err(AppError::validation(
                "Finish or cancel the current edit before editing another record",
            )),
            _ => {
                self.editing = Some(key);
                Ok(())
            }
        }
    }

    pub fn end_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&T::Key> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, key: &T::Key) -> bool {
        self.editing.as_ref() == Some(key)
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Call when the search box text changed.
    pub fn query_changed(&mut self, now: Instant) {
        self.debouncer.push(self.query.clone(), now);
    }

    /// Apply the debounced query once it is due. Returns `true` when the
    /// filter changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(query) if query != self.applied_query => {
                self.applied_query = query;
                true
            }
            _ => false,
        }
    }

    /// Time until the pending query is applied, for repaint scheduling.
    pub fn pending_search(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    /// Clear the search box and filter immediately.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.applied_query.clear();
        self.debouncer.cancel();
    }

    /// Panel teardown: drop the pending search and release the edit lock.
    pub fn leave(&mut self) {
        self.debouncer.cancel();
        self.editing = None;
    }

    // ---------------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------------

    /// Bring the local collection in line with an accepted mutation.
    ///
    /// Creates need a re-fetch; updates merge by key and deletes filter by
    /// key locally. Deleting an absent key is a no-op.
    pub fn reconcile(&mut self, mutation: Mutation<T>) -> Reconciled {
        match mutation {
            Mutation::Created => Reconciled::RefetchRequired,
            Mutation::Updated(record) => {
                let key = record.key();
                if let Some(slot) = self.items.iter_mut().find(|r| r.key() == key) {
                    *slot = record;
                }
                if self.editing.as_ref() == Some(&key) {
                    self.editing = None;
                }
                Reconciled::Patched
            }
            Mutation::Deleted(key) => {
                self.items.retain(|r| r.key() != key);
                if self.editing.as_ref() == Some(&key) {
                    self.editing = None;
                }
                Reconciled::Patched
            }
        }
    }
}

impl<T: Record + Searchable> ResourceList<T> {
    /// Records matching the applied query, best match first.
    pub fn visible(&self) -> Vec<&T> {
        search::fuzzy_filter(&self.items, &self.applied_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, name: &str) -> Item {
        Item {
            item_code: code.to_string(),
            item_name: name.to_string(),
            ..Default::default()
        }
    }

    fn list() -> ResourceList<Item> {
        let mut list = ResourceList::default();
        list.set_items(vec![item("A", "Router"), item("B", "Switch"), item("C", "Firewall")]);
        list
    }

    #[test]
    fn test_create_requires_refetch() {
        let mut list = list();
        assert_eq!(list.reconcile(Mutation::Created), Reconciled::RefetchRequired);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_update_patches_in_place() {
        let mut list = list();
        let outcome = list.reconcile(Mutation::Updated(item("B", "Core Switch")));
        assert_eq!(outcome, Reconciled::Patched);
        assert_eq!(list.items()[1].item_name, "Core Switch");
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_delete_removes_only_target() {
        let mut list = list();
        list.reconcile(Mutation::Deleted("B".to_string()));
        let codes: Vec<_> = list.items().iter().map(|i| i.item_code.as_str()).collect();
        assert_eq!(codes, vec!["A", "C"]);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut list = list();
        assert_eq!(list.reconcile(Mutation::Deleted("Z".to_string())), Reconciled::Patched);
        assert_eq!(list.items().len(), 3);
    }

    #[test]
    fn test_edit_lock() {
        let mut list = list();
        list.begin_edit("A".to_string()).unwrap();
        assert!(list.begin_edit("B".to_string()).is_err());
        assert!(list.begin_edit("A".to_string()).is_ok());
        assert!(list.is_editing(&"A".to_string()));

        list.end_edit();
        assert!(list.begin_edit("B".to_string()).is_ok());
    }

    #[test]
    fn test_update_releases_lock() {
        let mut list = list();
        list.begin_edit("A".to_string()).unwrap();
        list.reconcile(Mutation::Updated(item("A", "Edge Router")));
        assert!(list.editing().is_none());
    }

    #[test]
    fn test_debounced_search() {
        let mut list = list();
        let start = Instant::now();

        list.query = "swich".to_string();
        list.query_changed(start);
        assert!(!list.tick(start + Duration::from_millis(100)));
        assert_eq!(list.visible().len(), 3);

        assert!(list.tick(start + Duration::from_millis(260)));
        let names: Vec<_> = list.visible().iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Switch"]);
    }

    #[test]
    fn test_leave_cancels_pending_search() {
        let mut list = list();
        let start = Instant::now();
        list.query = "router".to_string();
        list.query_changed(start);
        list.leave();
        assert!(!list.tick(start + Duration::from_secs(1)));
        assert_eq!(list.applied_query(), "");
    }
}
