//! Recent search terms.

use crate::error::Result;
use crate::store::{LocalStore, SEARCH_HISTORY_KEY};

/// Maximum number of remembered searches.
pub const MAX_ENTRIES: usize = 10;

/// Most-recent-first list of search terms, persisted in the local store.
#[derive(Clone)]
pub struct SearchHistory {
    store: LocalStore,
    entries: Vec<String>,
}

impl SearchHistory {
    /// Load the saved history.
    pub fn load(store: LocalStore) -> Result<Self> {
        let mut entries: Vec<String> = store.get_json(SEARCH_HISTORY_KEY)?.unwrap_or_default();
        entries.truncate(MAX_ENTRIES);
        Ok(Self { store, entries })
    }

    /// Current entries, most recent first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Record a query.
    ///
    /// Blank queries are ignored. An exact duplicate moves to the front.
    pub fn record(&mut self, query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Ok(());
        }

        self.entries.retain(|e| e != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_ENTRIES);

        self.store.set_json(SEARCH_HISTORY_KEY, &self.entries)
    }

    /// Forget every entry.
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(SEARCH_HISTORY_KEY)?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first_with_dedupe() {
        let store = LocalStore::open_memory().unwrap();
        let mut history = SearchHistory::load(store).unwrap();

        history.record("solo").unwrap();
        history.record("martial").unwrap();
        history.record("solo").unwrap();

        assert_eq!(history.entries(), ["solo", "martial"]);
    }

    #[test]
    fn test_dedupe_is_exact_match() {
        let store = LocalStore::open_memory().unwrap();
        let mut history = SearchHistory::load(store).unwrap();

        history.record("Solo").unwrap();
        history.record("solo").unwrap();
        history.record("solo ").unwrap();

        assert_eq!(history.entries(), ["solo ", "solo", "Solo"]);
    }

    #[test]
    fn test_capped_at_ten() {
        let store = LocalStore::open_memory().unwrap();
        let mut history = SearchHistory::load(store.clone()).unwrap();

        for i in 0..15 {
            history.record(&format!("q{}", i)).unwrap();
        }

        assert_eq!(history.entries().len(), MAX_ENTRIES);
        assert_eq!(history.entries()[0], "q14");
        assert_eq!(history.entries()[9], "q5");

        let reloaded = SearchHistory::load(store).unwrap();
        assert_eq!(reloaded.entries(), history.entries());
    }

    #[test]
    fn test_blank_ignored_and_clear() {
        let store = LocalStore::open_memory().unwrap();
        let mut history = SearchHistory::load(store.clone()).unwrap();

        history.record("   ").unwrap();
        assert!(history.entries().is_empty());

        history.record("x").unwrap();
        history.clear().unwrap();
        assert!(history.entries().is_empty());
        assert!(SearchHistory::load(store).unwrap().entries().is_empty());
    }
}
