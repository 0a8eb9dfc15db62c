//! User profile: stats, published works, and library visibility.

use super::ScreenState;
use crate::api::{ApiClient, StatsTarget};
use crate::error::Result;
use crate::models::{LibraryEntry, LibraryKind, Novel, ProfileUpdate, User, UserStats};
use crate::notice::Notice;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Whose profile is shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProfileTarget {
    /// The logged-in user.
    #[default]
    Me,
    /// Another user by id.
    Id(String),
    /// Another user by email.
    Email(String),
}

impl ProfileTarget {
    fn stats_target(&self) -> StatsTarget<'_> {
        match self {
            ProfileTarget::Me => StatsTarget::Me,
            ProfileTarget::Id(id) => StatsTarget::Id(id),
            ProfileTarget::Email(email) => StatsTarget::Email(email),
        }
    }

    /// Whether this target points at `viewer`.
    pub fn is_self(&self, viewer: Option<&User>) -> bool {
        match (self, viewer) {
            (ProfileTarget::Me, _) => true,
            (ProfileTarget::Id(id), Some(user)) => *id == user.id,
            (ProfileTarget::Email(email), Some(user)) => *email == user.email,
            (_, None) => false,
        }
    }
}

/// Which profile image to replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    /// Avatar.
    Picture,
    /// Banner.
    Banner,
}

/// Loaded profile data.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    /// The profile owner, when known.
    pub user: Option<User>,
    /// Whether the viewer is looking at their own profile.
    pub is_self: bool,
    /// Works published by the user.
    pub works: Vec<Novel>,
    /// Chapters read.
    pub read_chapters: u64,
    /// Chapters published.
    pub added_chapters: u64,
    /// Views across published works.
    pub total_views: u64,
    /// Reading history, empty when hidden.
    pub history: Vec<LibraryEntry>,
    /// Favorites, empty when hidden.
    pub favorites: Vec<LibraryEntry>,
}

impl Profile {
    /// Whether the library tabs are visible.
    pub fn library_visible(&self) -> bool {
        self.is_self || self.user.as_ref().is_some_and(|u| u.is_history_public)
    }

    /// Join date for display.
    pub fn joined(&self) -> Option<DateTime<Utc>> {
        self.user.as_ref().and_then(|u| u.created_at)
    }

    fn from_stats(stats: UserStats, viewer: Option<&User>, is_self: bool) -> Self {
        // Older servers omit `user` when the caller asks about themselves.
        let user = stats
            .user
            .or_else(|| if is_self { viewer.cloned() } else { None });

        Self {
            user,
            is_self,
            works: stats.my_works,
            read_chapters: stats.read_chapters,
            added_chapters: stats.added_chapters,
            total_views: stats.total_views,
            history: Vec::new(),
            favorites: Vec::new(),
        }
    }

    /// Fetch stats, then the library when it is visible to the viewer.
    pub async fn load(
        api: &ApiClient,
        target: &ProfileTarget,
        viewer: Option<&User>,
    ) -> ScreenState<Self> {
        ScreenState::from_result(
            Self::fetch(api, target, viewer).await,
            "Failed to load profile",
        )
    }

    async fn fetch(api: &ApiClient, target: &ProfileTarget, viewer: Option<&User>) -> Result<Self> {
        let is_self = target.is_self(viewer);
        let stats = api.user_stats(target.stats_target()).await?;
        let mut profile = Self::from_stats(stats, viewer, is_self);

        if profile.library_visible() {
            let user_id = if is_self {
                None
            } else {
                profile.user.as_ref().map(|u| u.id.as_str())
            };
            profile.history = api.library(LibraryKind::History, user_id).await?;
            profile.favorites = api.library(LibraryKind::Favorites, user_id).await?;
        }

        tracing::debug!(
            is_self,
            works = profile.works.len(),
            library = profile.library_visible(),
            "Profile loaded"
        );
        Ok(profile)
    }
}

/// Save name, bio and history visibility.
pub async fn save_profile(api: &ApiClient, update: &ProfileUpdate) -> Notice {
    match api.update_profile(update).await {
        Ok(()) => Notice::success("Changes saved"),
        Err(e) => {
            tracing::warn!(error = %e, "Profile update failed");
            Notice::error("Failed to save changes")
        }
    }
}

/// Upload an image and set it as the avatar or banner.
pub async fn replace_image(api: &ApiClient, kind: ProfileImage, path: &Path) -> Notice {
    let result = async {
        let url = api.upload_image(path).await?;
        let update = match kind {
            ProfileImage::Picture => ProfileUpdate {
                picture: Some(url),
                ..Default::default()
            },
            ProfileImage::Banner => ProfileUpdate {
                banner: Some(url),
                ..Default::default()
            },
        };
        api.update_profile(&update).await
    }
    .await;

    match result {
        Ok(()) => Notice::success("Image updated"),
        Err(e) => {
            tracing::warn!(error = %e, ?kind, "Image upload failed");
            Notice::error("Image upload failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> User {
        User {
            id: "u1".to_string(),
            email: "me@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_self() {
        let me = viewer();
        assert!(ProfileTarget::Me.is_self(Some(&me)));
        assert!(ProfileTarget::Id("u1".into()).is_self(Some(&me)));
        assert!(ProfileTarget::Email("me@example.com".into()).is_self(Some(&me)));
        assert!(!ProfileTarget::Id("u2".into()).is_self(Some(&me)));
        assert!(!ProfileTarget::Id("u1".into()).is_self(None));
    }

    #[test]
    fn test_library_visibility() {
        let private = UserStats {
            user: Some(User {
                id: "u2".into(),
                is_history_public: false,
                ..Default::default()
            }),
            ..Default::default()
        };
        let profile = Profile::from_stats(private.clone(), Some(&viewer()), false);
        assert!(!profile.library_visible());

        let profile = Profile::from_stats(private, Some(&viewer()), true);
        assert!(profile.library_visible());
    }

    #[test]
    fn test_self_profile_falls_back_to_viewer() {
        let me = viewer();
        let profile = Profile::from_stats(UserStats::default(), Some(&me), true);
        assert_eq!(profile.user.map(|u| u.id), Some("u1".to_string()));

        let other = Profile::from_stats(UserStats::default(), Some(&me), false);
        assert!(other.user.is_none());
    }
}
