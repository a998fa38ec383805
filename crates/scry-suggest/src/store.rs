//! Storage for pinned and recently used filters.

use std::collections::VecDeque;

use parking_lot::RwLock;
use scry_query::FilterExpr;

/// A list of saved filters, most recent first.
///
/// Implementations must make each write a single atomic step so readers never see a
/// half-applied change.
pub trait FilterStore: Send + Sync {
    /// All entries, most recent first.
    fn entries(&self) -> Vec<FilterExpr>;

    /// Moves `expr` to the front, adding it if absent.
    fn record(&self, expr: FilterExpr);

    /// Removes `expr`. Returns whether it was present.
    fn remove(&self, expr: &FilterExpr) -> bool;
}

/// An in-memory [`FilterStore`], optionally bounded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Entries, most recent first.
    entries: RwLock<VecDeque<FilterExpr>>,
    /// Maximum number of entries kept, if bounded.
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that keeps at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity: Some(capacity),
        }
    }

    /// Fills the store from entries listed most recent first.
    ///
    /// Later duplicates are dropped and the capacity is applied.
    pub fn with_entries(self, entries: impl IntoIterator<Item = FilterExpr>) -> Self {
        {
            let mut list = self.entries.write();
            for expr in entries {
                if !list.contains(&expr) {
                    list.push_back(expr);
                }
            }
            if let Some(capacity) = self.capacity {
                list.truncate(capacity);
            }
        }
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl FilterStore for MemoryStore {
    fn entries(&self) -> Vec<FilterExpr> {
        self.entries.read().iter().cloned().collect()
    }

    fn record(&self, expr: FilterExpr) {
        let mut list = self.entries.write();
        list.retain(|existing| existing != &expr);
        list.push_front(expr);
        if let Some(capacity) = self.capacity {
            list.truncate(capacity);
        }
    }

    fn remove(&self, expr: &FilterExpr) -> bool {
        let mut list = self.entries.write();
        let before = list.len();
        list.retain(|existing| existing != expr);
        list.len() != before
    }
}
