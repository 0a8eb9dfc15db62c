//! Catalogue browser with filters and numbered pagination.

use super::ScreenState;
use crate::api::ApiClient;
use crate::models::{NovelPage, NovelStatus};

/// Number of page buttons shown at once.
const MAX_PAGE_BUTTONS: u32 = 5;

/// Server-side sort order. The client only passes the key through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Most chapters first.
    #[default]
    ChaptersDesc,
    /// Fewest chapters first.
    ChaptersAsc,
    /// Title A to Z.
    TitleAsc,
    /// Title Z to A.
    TitleDesc,
}

impl SortKey {
    /// Query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ChaptersDesc => "chapters_desc",
            SortKey::ChaptersAsc => "chapters_asc",
            SortKey::TitleAsc => "title_asc",
            SortKey::TitleDesc => "title_desc",
        }
    }
}

/// Filter set composed into one `GET /api/novels` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryFilters {
    category: String,
    status: Option<NovelStatus>,
    sort: SortKey,
    search: String,
    page: u32,
}

impl Default for LibraryFilters {
    fn default() -> Self {
        Self {
            category: "all".to_string(),
            status: None,
            sort: SortKey::default(),
            search: String::new(),
            page: 1,
        }
    }
}

impl LibraryFilters {
    /// Current page (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Category id, `all` for every category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Status filter, `None` for every status.
    pub fn status(&self) -> Option<NovelStatus> {
        self.status
    }

    /// Sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Free-text search.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change category; resets to page 1.
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.category = if category.trim().is_empty() {
            "all".to_string()
        } else {
            category
        };
        self.page = 1;
    }

    /// Change status; resets to page 1.
    pub fn set_status(&mut self, status: Option<NovelStatus>) {
        self.status = status;
        self.page = 1;
    }

    /// Change sort key; resets to page 1.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Change search text; resets to page 1.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    /// Query pairs for a page of `limit` novels.
    pub fn to_query(&self, limit: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", limit.to_string()),
            ("category", self.category.clone()),
            (
                "status",
                self.status
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| "all".to_string()),
            ),
            ("sort", self.sort.as_str().to_string()),
            ("search", self.search.clone()),
        ]
    }
}

/// Visible page buttons and arrow availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Page numbers to show, ascending.
    pub pages: Vec<u32>,
    /// A "previous" arrow is shown.
    pub has_prev: bool,
    /// A "next" arrow is shown.
    pub has_next: bool,
}

/// Up to five page buttons around `page`. `None` when there is one page.
pub fn page_window(page: u32, total_pages: u32) -> Option<PageWindow> {
    if total_pages <= 1 {
        return None;
    }

    let page = page.clamp(1, total_pages);
    let mut start = page.saturating_sub(2).max(1);
    let end = (start + MAX_PAGE_BUTTONS - 1).min(total_pages);
    if end - start < MAX_PAGE_BUTTONS - 1 {
        start = end.saturating_sub(MAX_PAGE_BUTTONS - 1).max(1);
    }

    Some(PageWindow {
        pages: (start..=end).collect(),
        has_prev: page > 1,
        has_next: page < total_pages,
    })
}

/// Library browser controller.
#[derive(Debug, Clone)]
pub struct LibraryBrowser {
    filters: LibraryFilters,
    page_size: u32,
    total_pages: u32,
    state: ScreenState<NovelPage>,
}

impl LibraryBrowser {
    /// New browser showing `page_size` novels per page.
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: LibraryFilters::default(),
            page_size: page_size.max(1),
            total_pages: 1,
            state: ScreenState::Loading,
        }
    }

    /// Active filters.
    pub fn filters(&self) -> &LibraryFilters {
        &self.filters
    }

    /// Mutable filters. Setters reset the page.
    pub fn filters_mut(&mut self) -> &mut LibraryFilters {
        &mut self.filters
    }

    /// Current state.
    pub fn state(&self) -> &ScreenState<NovelPage> {
        &self.state
    }

    /// Jump to a page, clamped to what the server reported.
    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page.clamp(1, self.total_pages.max(1));
    }

    /// Pagination controls for the current result.
    pub fn pagination(&self) -> Option<PageWindow> {
        page_window(self.filters.page, self.total_pages)
    }

    /// Fetch the page described by the current filters.
    pub async fn load(&mut self, api: &ApiClient) {
        self.state = ScreenState::Loading;
        let query = self.filters.to_query(self.page_size);
        tracing::debug!(?query, "Fetching library page");

        let result = api.list_novels(&query).await;
        if let Ok(page) = &result {
            self.total_pages = page.total_pages.max(1);
        }
        self.state = ScreenState::from_result(result, "Failed to load novels");
    }

    /// Fetch `page` directly, before the page count is known.
    ///
    /// A page past the end is refetched as the last page once the server has
    /// reported the count.
    pub async fn load_page(&mut self, api: &ApiClient, page: u32) {
        self.filters.page = page.max(1);
        self.load(api).await;

        if self.state.data().is_some() && self.filters.page > self.total_pages {
            tracing::debug!(
                requested = self.filters.page,
                total_pages = self.total_pages,
                "Page out of range, loading last page"
            );
            self.filters.page = self.total_pages;
            self.load(api).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_filter_change_resets_page() {
        let mut filters = LibraryFilters {
            page: 4,
            ..Default::default()
        };
        filters.set_category("fantasy");
        assert_eq!(filters.page(), 1);

        filters.page = 4;
        filters.set_status(Some(NovelStatus::Completed));
        assert_eq!(filters.page(), 1);

        filters.page = 4;
        filters.set_sort(SortKey::TitleAsc);
        assert_eq!(filters.page(), 1);

        filters.page = 4;
        filters.set_search("dragon");
        assert_eq!(filters.page(), 1);
    }

    #[test]
    fn test_query_passes_defaults_through() {
        let filters = LibraryFilters::default();
        let query = filters.to_query(20);
        assert_eq!(
            query,
            vec![
                ("page", "1".to_string()),
                ("limit", "20".to_string()),
                ("category", "all".to_string()),
                ("status", "all".to_string()),
                ("sort", "chapters_desc".to_string()),
                ("search", String::new()),
            ]
        );
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 1), None);

        let w = page_window(1, 10).unwrap();
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);
        assert!(!w.has_prev);
        assert!(w.has_next);

        let w = page_window(6, 10).unwrap();
        assert_eq!(w.pages, vec![4, 5, 6, 7, 8]);

        let w = page_window(10, 10).unwrap();
        assert_eq!(w.pages, vec![6, 7, 8, 9, 10]);
        assert!(!w.has_next);

        let w = page_window(2, 3).unwrap();
        assert_eq!(w.pages, vec![1, 2, 3]);
    }

    #[test]
    fn test_set_page_clamps_to_known_total() {
        let mut browser = LibraryBrowser::new(20);
        browser.total_pages = 3;
        browser.set_page(9);
        assert_eq!(browser.filters().page(), 3);
        browser.set_page(0);
        assert_eq!(browser.filters().page(), 1);
    }
}
