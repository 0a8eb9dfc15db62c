//! Home screen: curated shelves, continue-reading card and notifications.

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{LibraryEntry, LibraryKind, Novel};
use crate::notifications::NotificationFeed;

/// Window for the trending shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TrendingRange {
    /// Last 24 hours.
    #[default]
    Day,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
}

impl TrendingRange {
    /// Query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingRange::Day => "day",
            TrendingRange::Week => "week",
            TrendingRange::Month => "month",
        }
    }
}

/// Named server-side shelf of `GET /api/novels?filter=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    /// Most viewed overall.
    Featured,
    /// Most viewed in a time window.
    Trending(TrendingRange),
    /// Recently updated.
    LatestUpdates,
    /// Recently added.
    LatestAdded,
}

impl Shelf {
    /// Query pairs for this shelf.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Shelf::Featured => vec![("filter", "featured".into()), ("limit", "5".into())],
            Shelf::Trending(range) => vec![
                ("filter", "trending".into()),
                ("timeRange", range.as_str().into()),
            ],
            Shelf::LatestUpdates => vec![
                ("filter", "latest_updates".into()),
                ("limit", "24".into()),
            ],
            Shelf::LatestAdded => vec![("filter", "latest_added".into())],
        }
    }
}

/// Home screen data.
#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    /// Carousel of featured novels.
    pub featured: Vec<Novel>,
    /// Trending shelf.
    pub trending: Vec<Novel>,
    /// Active trending window.
    pub trending_range: TrendingRange,
    /// Recently updated novels.
    pub latest_updates: Vec<Novel>,
    /// Recently added novels.
    pub new_arrivals: Vec<Novel>,
    /// Most recent history entry, for the continue-reading card.
    pub last_read: Option<LibraryEntry>,
    /// Notification feed.
    pub notifications: NotificationFeed,
}

async fn shelf(api: &ApiClient, shelf: Shelf) -> Result<Vec<Novel>> {
    Ok(api.list_novels(&shelf.query()).await?.novels)
}

impl HomeFeed {
    /// Load every shelf. A failing shelf stays empty and is logged.
    pub async fn load(api: &ApiClient, trending_range: TrendingRange) -> Self {
        let mut feed = Self {
            trending_range,
            ..Default::default()
        };

        match shelf(api, Shelf::Featured).await {
            Ok(novels) => feed.featured = novels,
            Err(e) => tracing::warn!(error = %e, "Failed to load featured novels"),
        }
        feed.load_trending(api, trending_range).await;
        match shelf(api, Shelf::LatestUpdates).await {
            Ok(novels) => feed.latest_updates = novels,
            Err(e) => tracing::warn!(error = %e, "Failed to load latest updates"),
        }
        match shelf(api, Shelf::LatestAdded).await {
            Ok(novels) => feed.new_arrivals = novels,
            Err(e) => tracing::warn!(error = %e, "Failed to load new arrivals"),
        }

        feed.on_focus(api).await;
        feed
    }

    /// Switch the trending window and refetch that shelf.
    pub async fn load_trending(&mut self, api: &ApiClient, range: TrendingRange) {
        self.trending_range = range;
        match shelf(api, Shelf::Trending(range)).await {
            Ok(novels) => self.trending = novels,
            Err(e) => tracing::warn!(error = %e, range = range.as_str(), "Failed to load trending"),
        }
    }

    /// Refresh the per-user parts: continue-reading card and notifications.
    pub async fn on_focus(&mut self, api: &ApiClient) {
        if api.has_token() {
            match api.library(LibraryKind::History, None).await {
                Ok(history) => self.last_read = history.into_iter().next(),
                Err(e) => tracing::warn!(error = %e, "Failed to fetch last read"),
            }
            self.notifications.refresh(api).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_queries() {
        assert_eq!(
            Shelf::Featured.query(),
            vec![("filter", "featured".to_string()), ("limit", "5".to_string())]
        );
        assert_eq!(
            Shelf::Trending(TrendingRange::Week).query(),
            vec![
                ("filter", "trending".to_string()),
                ("timeRange", "week".to_string())
            ]
        );
        assert_eq!(
            Shelf::LatestAdded.query(),
            vec![("filter", "latest_added".to_string())]
        );
    }
}
