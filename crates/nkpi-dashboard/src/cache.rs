//! Memoized fetches.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use nkpi_model::RawTable;

use crate::error::Result;
use crate::source::{SourceRequest, TableSource};

/// Tables already fetched, keyed by request text.
///
/// Owned by the dashboard shell and passed to renders explicitly. A request
/// with different text is a different key, so a changed query or range is
/// always fetched fresh. Failed fetches are not cached.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<String, RawTable>,
    hits: usize,
    misses: usize,
}

impl FetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_fetch(
        &mut self,
        request: &SourceRequest,
        source: &dyn TableSource,
    ) -> Result<&RawTable> {
        match self.entries.entry(request.cache_key()) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                debug!(key = %entry.key(), "fetch cache hit");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                let table = source.fetch(request)?;
                debug!(key = %entry.key(), rows = table.len(), "fetch cache miss");
                Ok(entry.insert(table))
            }
        }
    }

    /// Drop one entry; returns whether it was cached.
    pub fn invalidate(&mut self, request: &SourceRequest) -> bool {
        self.entries.remove(&request.cache_key()).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::DashboardError;

    struct Counting {
        calls: Cell<usize>,
    }

    impl TableSource for Counting {
        fn fetch(&self, request: &SourceRequest) -> Result<RawTable> {
            self.calls.set(self.calls.get() + 1);
            match request {
                SourceRequest::Query { sql } if sql == "fail" => {
                    Err(DashboardError::missing(request.cache_key()))
                }
                _ => Ok(RawTable::new(vec!["Month-Year".to_string()])),
            }
        }
    }

    #[test]
    fn fetches_each_key_once() {
        let source = Counting { calls: Cell::new(0) };
        let mut cache = FetchCache::new();
        let a = SourceRequest::query("SELECT a");
        let b = SourceRequest::query("SELECT b");

        cache.get_or_fetch(&a, &source).unwrap();
        cache.get_or_fetch(&a, &source).unwrap();
        cache.get_or_fetch(&b, &source).unwrap();

        assert_eq!(source.calls.get(), 2);
        assert_eq!((cache.hits(), cache.misses()), (1, 2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidate_and_clear_force_refetch() {
        let source = Counting { calls: Cell::new(0) };
        let mut cache = FetchCache::new();
        let a = SourceRequest::range("A1:B2");

        cache.get_or_fetch(&a, &source).unwrap();
        assert!(cache.invalidate(&a));
        assert!(!cache.invalidate(&a));
        cache.get_or_fetch(&a, &source).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_fetch(&a, &source).unwrap();

        assert_eq!(source.calls.get(), 3);
    }

    #[test]
    fn failures_are_not_cached() {
        let source = Counting { calls: Cell::new(0) };
        let mut cache = FetchCache::new();
        let failing = SourceRequest::query("fail");

        assert!(cache.get_or_fetch(&failing, &source).is_err());
        assert!(cache.get_or_fetch(&failing, &source).is_err());
        assert_eq!(source.calls.get(), 2);
        assert!(cache.is_empty());
    }
}
