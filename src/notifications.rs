//! Pull-on-focus feed of favorited novels with unread chapters.

use crate::api::ApiClient;
use crate::models::{Notification, NotificationsResponse};

/// Cached notification feed. Refreshed whenever its screen gains focus.
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    feed: NotificationsResponse,
    loaded: bool,
}

impl NotificationFeed {
    /// Empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the feed. On failure the previous feed is kept.
    pub async fn refresh(&mut self, api: &ApiClient) -> bool {
        match api.notifications().await {
            Ok(feed) => {
                tracing::debug!(
                    novels = feed.notifications.len(),
                    unread = feed.total_unread,
                    "Notifications refreshed"
                );
                self.feed = feed;
                self.loaded = true;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch notifications");
                false
            }
        }
    }

    /// Whether at least one fetch has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Novels with new chapters.
    pub fn items(&self) -> &[Notification] {
        &self.feed.notifications
    }

    /// Total unread chapters.
    pub fn unread(&self) -> u32 {
        self.feed.total_unread
    }

    /// Badge text, hidden when nothing is unread.
    pub fn badge(&self) -> Option<String> {
        match self.feed.total_unread {
            0 => None,
            n if n > 99 => Some("99+".to_string()),
            n => Some(n.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_hidden_when_zero() {
        let mut feed = NotificationFeed::new();
        assert_eq!(feed.badge(), None);

        feed.feed.total_unread = 7;
        assert_eq!(feed.badge().as_deref(), Some("7"));

        feed.feed.total_unread = 150;
        assert_eq!(feed.badge().as_deref(), Some("99+"));
    }
}
