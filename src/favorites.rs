//! Optimistic favorite toggle with rollback.
//!
//! The local flag and counter flip before the request resolves and are
//! restored on failure. Nothing prevents a second toggle from starting while
//! the first is in flight; each rollback restores the state its own toggle
//! captured, so overlapping failures can leave the local view out of step
//! with the server until the next refetch.

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{LibraryUpdate, Novel};
use crate::notice::Notice;

/// Locally displayed favorite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FavoriteState {
    /// Whether the novel is in the user's favorites.
    pub is_favorite: bool,
    /// Favorite counter shown next to the novel.
    pub favorites: u64,
}

/// A toggle that has been applied locally but not yet settled.
#[derive(Debug, Clone, Copy)]
#[must_use = "a pending toggle must be settled"]
pub struct PendingToggle {
    previous: FavoriteState,
    target: bool,
}

impl PendingToggle {
    /// Favorite flag being requested.
    pub fn target(&self) -> bool {
        self.target
    }

    /// Request body for this toggle.
    pub fn request(&self, novel: &Novel) -> LibraryUpdate {
        LibraryUpdate {
            is_favorite: Some(self.target),
            ..LibraryUpdate::for_novel(novel)
        }
    }
}

/// Favorite toggle controller for one novel.
#[derive(Debug, Clone)]
pub struct FavoriteToggle {
    state: FavoriteState,
}

impl FavoriteToggle {
    /// Start from server-reported values.
    pub fn new(is_favorite: bool, favorites: u64) -> Self {
        Self {
            state: FavoriteState {
                is_favorite,
                favorites,
            },
        }
    }

    /// Current local state.
    pub fn state(&self) -> FavoriteState {
        self.state
    }

    /// Flip the local state and return the pending request.
    pub fn begin(&mut self) -> PendingToggle {
        let previous = self.state;
        let target = !previous.is_favorite;

        self.state.is_favorite = target;
        self.state.favorites = if target {
            previous.favorites.saturating_add(1)
        } else {
            previous.favorites.saturating_sub(1)
        };

        PendingToggle { previous, target }
    }

    /// Apply the request outcome, rolling back on failure.
    pub fn settle(&mut self, pending: PendingToggle, result: Result<()>) -> Notice {
        match result {
            Ok(()) if pending.target => Notice::success("Added to favorites"),
            Ok(()) => Notice::info("Removed from favorites"),
            Err(e) => {
                tracing::warn!(error = %e, target = pending.target, "Favorite toggle failed, reverting");
                self.state = pending.previous;
                Notice::error("Operation failed")
            }
        }
    }

    /// Begin, send and settle in one step.
    pub async fn toggle(&mut self, api: &ApiClient, novel: &Novel) -> Notice {
        let pending = self.begin();
        let result = api.update_library(&pending.request(novel)).await;
        self.settle(pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn failure() -> Result<()> {
        Err(AppError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        })
    }

    #[test]
    fn test_begin_flips_flag_and_counter() {
        let mut toggle = FavoriteToggle::new(false, 10);
        let pending = toggle.begin();

        assert!(pending.target());
        assert_eq!(
            toggle.state(),
            FavoriteState {
                is_favorite: true,
                favorites: 11
            }
        );
    }

    #[test]
    fn test_double_toggle_returns_to_original() {
        let mut toggle = FavoriteToggle::new(true, 3);
        let original = toggle.state();

        let first = toggle.begin();
        let notice = toggle.settle(first, Ok(()));
        assert_eq!(notice, Notice::info("Removed from favorites"));

        let second = toggle.begin();
        let notice = toggle.settle(second, Ok(()));
        assert_eq!(notice, Notice::success("Added to favorites"));

        assert_eq!(toggle.state(), original);
    }

    #[test]
    fn test_failure_reverts_to_pre_toggle_state() {
        let mut toggle = FavoriteToggle::new(false, 0);
        let original = toggle.state();

        let pending = toggle.begin();
        let notice = toggle.settle(pending, failure());

        assert!(notice.is_error());
        assert_eq!(toggle.state(), original);
    }

    #[test]
    fn test_counter_never_underflows() {
        let mut toggle = FavoriteToggle::new(true, 0);
        let _pending = toggle.begin();
        assert_eq!(toggle.state().favorites, 0);
    }

    #[test]
    fn test_overlapping_toggles_each_restore_their_own_snapshot() {
        let mut toggle = FavoriteToggle::new(false, 5);

        let first = toggle.begin();
        let second = toggle.begin();
        assert!(!toggle.state().is_favorite);

        // Second succeeds, then first fails and restores what it saw.
        let _ = toggle.settle(second, Ok(()));
        let _ = toggle.settle(first, failure());
        assert_eq!(
            toggle.state(),
            FavoriteState {
                is_favorite: false,
                favorites: 5
            }
        );
    }
}
