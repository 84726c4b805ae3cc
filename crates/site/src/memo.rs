//! Compute-once-per-request memoization keyed by canonical path.

use std::collections::HashMap;

/// Caches one value per canonical path for the lifetime of a request.
///
/// Owned by the caller and dropped with the request, so nothing outlives it
/// and no locking is needed.
#[derive(Debug)]
pub struct PageMemo<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for PageMemo<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> PageMemo<V> {
    /// An empty memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `canonical_path`, computing it on first use.
    pub fn get_or_insert_with(&mut self, canonical_path: &str, compute: impl FnOnce() -> V) -> &V {
        self.entries
            .entry(canonical_path.to_string())
            .or_insert_with(compute)
    }

    /// Cached value, if computed.
    pub fn get(&self, canonical_path: &str) -> Option<&V> {
        self.entries.get(canonical_path)
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_per_path() {
        let calls = Cell::new(0);
        let mut memo = PageMemo::new();
        let compute = || {
            calls.set(calls.get() + 1);
            calls.get()
        };

        assert_eq!(*memo.get_or_insert_with("components/alert", compute), 1);
        assert_eq!(*memo.get_or_insert_with("components/alert", compute), 1);
        assert_eq!(*memo.get_or_insert_with("components/drawer", compute), 2);
        assert_eq!(memo.len(), 2);
        assert_eq!(memo.get("components/alert"), Some(&1));
        assert_eq!(memo.get("components/navbar"), None);
    }
}
