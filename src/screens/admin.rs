//! Authoring and moderation console.
//!
//! Drafts validate locally before anything is sent; the server remains the
//! authority on permissions and uniqueness.

use super::ScreenState;
use crate::api::{ApiClient, StatsTarget};
use crate::error::{AppError, Result};
use crate::models::{
    ChapterSummary, ChapterUpdate, NewChapter, Novel, NovelPayload, NovelStatus, Role, User,
};
use crate::notice::Notice;

/// Category used when a novel has no tags.
pub const FALLBACK_CATEGORY: &str = "other";

/// Novel create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NovelDraft {
    /// Title (required).
    pub title: String,
    /// Cover URL (required).
    pub cover: String,
    /// Synopsis.
    pub description: String,
    /// Selected tags, in selection order.
    pub tags: Vec<String>,
    /// Publication status.
    pub status: NovelStatus,
}

impl NovelDraft {
    /// Prefill from an existing novel.
    pub fn from_novel(novel: &Novel) -> Self {
        Self {
            title: novel.title.clone(),
            cover: novel.cover.clone().unwrap_or_default(),
            description: novel.description.clone().unwrap_or_default(),
            tags: novel.tags.clone(),
            status: novel.status,
        }
    }

    /// Select or deselect a tag.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// Add a free-form tag. Blank and duplicate tags are ignored.
    pub fn add_custom_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Validate and build the request body.
    pub fn to_payload(&self) -> Result<NovelPayload> {
        if self.title.trim().is_empty() || self.cover.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Title and cover are required".to_string(),
            ));
        }

        Ok(NovelPayload {
            title: self.title.trim().to_string(),
            cover: self.cover.trim().to_string(),
            description: self.description.clone(),
            category: self
                .tags
                .first()
                .cloned()
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            tags: self.tags.clone(),
            status: self.status,
        })
    }
}

/// Chapter create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterDraft {
    /// Target novel.
    pub novel_id: String,
    /// Chapter number.
    pub number: Option<u32>,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
}

impl ChapterDraft {
    /// Empty draft numbered after the existing chapters.
    pub fn next_for(novel: &Novel) -> Self {
        Self {
            novel_id: novel.id.clone(),
            number: Some(next_chapter_number(&novel.chapters)),
            ..Default::default()
        }
    }

    fn require_all(&self) -> Result<u32> {
        match self.number {
            Some(number)
                if number > 0
                    && !self.novel_id.trim().is_empty()
                    && !self.title.trim().is_empty()
                    && !self.content.trim().is_empty() =>
            {
                Ok(number)
            }
            _ => Err(AppError::InvalidInput("All fields are required".to_string())),
        }
    }

    /// Body for a new chapter.
    pub fn to_new(&self) -> Result<NewChapter> {
        let number = self.require_all()?;
        Ok(NewChapter {
            novel_id: self.novel_id.clone(),
            number,
            title: self.title.clone(),
            content: self.content.clone(),
        })
    }

    /// Number and body for an edit.
    pub fn to_update(&self) -> Result<(u32, ChapterUpdate)> {
        let number = self.require_all()?;
        Ok((
            number,
            ChapterUpdate {
                title: self.title.clone(),
                content: self.content.clone(),
            },
        ))
    }
}

/// Number for the next chapter: one past the highest, or 1.
pub fn next_chapter_number(chapters: &[ChapterSummary]) -> u32 {
    chapters
        .iter()
        .map(|c| c.number)
        .max()
        .map_or(1, |n| n.saturating_add(1))
}

/// Create a novel, or update it when `novel_id` is given.
pub async fn save_novel(api: &ApiClient, novel_id: Option<&str>, draft: &NovelDraft) -> Notice {
    let payload = match draft.to_payload() {
        Ok(payload) => payload,
        Err(e) => return Notice::error(e.user_message("Fill in the required fields")),
    };

    let (result, done) = match novel_id {
        Some(id) => (api.update_novel(id, &payload).await, "Novel updated"),
        None => (api.create_novel(&payload).await, "Novel created"),
    };

    match result {
        Ok(()) => {
            tracing::info!(title = %payload.title, "{}", done);
            Notice::success(done)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Novel save failed");
            Notice::error("Operation failed")
        }
    }
}

/// Delete a novel.
pub async fn delete_novel(api: &ApiClient, novel_id: &str) -> Notice {
    match api.delete_novel(novel_id).await {
        Ok(()) => Notice::success("Deleted"),
        Err(e) => {
            tracing::warn!(error = %e, novel_id, "Novel delete failed");
            Notice::error("Delete failed")
        }
    }
}

/// Create a chapter, or edit it when `editing` is set.
pub async fn save_chapter(api: &ApiClient, draft: &ChapterDraft, editing: bool) -> Notice {
    let result = if editing {
        match draft.to_update() {
            Ok((number, update)) => api
                .update_chapter(&draft.novel_id, number, &update)
                .await
                .map(|()| "Chapter updated"),
            Err(e) => Err(e),
        }
    } else {
        match draft.to_new() {
            Ok(chapter) => api.create_chapter(&chapter).await.map(|()| "Chapter added"),
            Err(e) => Err(e),
        }
    };

    match result {
        Ok(done) => Notice::success(done),
        Err(e) => {
            tracing::warn!(error = %e, novel_id = %draft.novel_id, "Chapter save failed");
            Notice::error(e.user_message("Upload failed"))
        }
    }
}

/// Works published by the logged-in user.
pub async fn my_works(api: &ApiClient) -> ScreenState<Vec<Novel>> {
    let result = api.user_stats(StatsTarget::Me).await.map(|s| s.my_works);
    ScreenState::from_result(result, "Failed to fetch works")
}

/// Headline numbers for the admin landing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Registered users.
    pub users: usize,
    /// Novels in the catalogue.
    pub novels: u64,
}

impl DashboardStats {
    /// Count users and novels from the list endpoints.
    pub async fn load(api: &ApiClient) -> Result<Self> {
        let users = api.users().await?.len();
        let novels = api
            .list_novels(&[("limit", "1".to_string())])
            .await?
            .total_novels;
        Ok(Self { users, novels })
    }
}

/// Registered users.
pub async fn users(api: &ApiClient) -> ScreenState<Vec<User>> {
    ScreenState::from_result(api.users().await, "Failed to fetch users")
}

/// Change a user's role.
pub async fn change_role(api: &ApiClient, user_id: &str, role: Role) -> Notice {
    match api.set_user_role(user_id, role).await {
        Ok(()) => Notice::success(format!("Role changed to {}", role)),
        Err(e) => {
            tracing::warn!(error = %e, user_id, "Role change failed");
            Notice::error("Update failed")
        }
    }
}

/// Delete a user account.
pub async fn remove_user(api: &ApiClient, user_id: &str) -> Notice {
    match api.delete_user(user_id).await {
        Ok(()) => Notice::success("User deleted"),
        Err(e) => {
            tracing::warn!(error = %e, user_id, "User delete failed");
            Notice::error(e.user_message("Delete failed"))
        }
    }
}
