//! Title search with recent-search memory.

use super::ScreenState;
use crate::api::ApiClient;
use crate::error::Result;
use crate::history::SearchHistory;
use crate::models::Novel;

/// Search screen controller.
pub struct SearchScreen {
    history: SearchHistory,
    query: String,
    results: ScreenState<Vec<Novel>>,
}

impl SearchScreen {
    /// New screen over the saved history.
    pub fn new(history: SearchHistory) -> Self {
        Self {
            history,
            query: String::new(),
            results: ScreenState::Loaded(Vec::new()),
        }
    }

    /// Recent searches, most recent first.
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// Current query.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current results.
    pub fn results(&self) -> &ScreenState<Vec<Novel>> {
        &self.results
    }

    /// Run a search. A blank query clears results without a request.
    pub async fn search(&mut self, api: &ApiClient, query: &str) {
        self.query = query.to_string();

        if query.trim().is_empty() {
            self.results = ScreenState::Loaded(Vec::new());
            return;
        }

        self.results = ScreenState::Loading;
        let result = api
            .list_novels(&[("search", query.to_string())])
            .await
            .map(|page| page.novels);
        self.results = ScreenState::from_result(result, "Search failed");
    }

    /// Open the `index`-th result (0-based), remembering the query.
    pub fn open(&mut self, index: usize) -> Result<Option<&Novel>> {
        let Some(novels) = self.results.data() else {
            return Ok(None);
        };
        if index >= novels.len() {
            return Ok(None);
        }

        self.history.record(&self.query)?;
        Ok(self.results.data().and_then(|n| n.get(index)))
    }

    /// Forget recent searches.
    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }
}
