//! Novel detail: metadata, chapter list, favorite toggle and resume target.

use super::ScreenState;
use crate::api::{ApiClient, StatsTarget};
use crate::favorites::FavoriteToggle;
use crate::models::{ChapterSummary, Novel, ReadingStatus, User};
use crate::notice::Notice;

/// Chapter to open from the "read" button.
///
/// Continues after the last chapter read; stays on it when it is the final
/// chapter; starts from 1 when nothing (or something out of range) was read.
pub fn resume_target(last_read: u32, chapter_count: u32) -> u32 {
    if last_read > 0 && last_read < chapter_count {
        last_read + 1
    } else if last_read == chapter_count && last_read > 0 {
        last_read
    } else {
        1
    }
}

/// Loaded detail data.
#[derive(Debug, Clone)]
pub struct NovelDetail {
    /// Novel with its chapter list.
    pub novel: Novel,
    /// Publisher profile, when the novel records an author email.
    pub author: Option<User>,
    /// The viewer's reading status.
    pub status: ReadingStatus,
    favorite: FavoriteToggle,
}

impl NovelDetail {
    /// Fetch the novel, then the author profile and reading status.
    ///
    /// Only the novel itself is required; the other two are best-effort.
    pub async fn load(api: &ApiClient, novel_id: &str) -> ScreenState<Self> {
        if novel_id.trim().is_empty() {
            return ScreenState::Error("Novel ID not found".to_string());
        }

        let novel = match api.novel(novel_id).await {
            Ok(novel) => novel,
            Err(e) => return ScreenState::from_result(Err(e), "Failed to load novel"),
        };

        let author = match novel.author_email.as_deref().filter(|e| !e.is_empty()) {
            Some(email) => match api.user_stats(StatsTarget::Email(email)).await {
                Ok(stats) => stats.user,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to fetch author profile");
                    None
                }
            },
            None => None,
        };

        let status = if api.has_token() {
            api.reading_status(novel_id).await.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Status check failed, ignoring");
                ReadingStatus::default()
            })
        } else {
            ReadingStatus::default()
        };

        ScreenState::Loaded(Self::new(novel, author, status))
    }

    /// Assemble from already-fetched parts.
    pub fn new(novel: Novel, author: Option<User>, status: ReadingStatus) -> Self {
        let favorite = FavoriteToggle::new(status.is_favorite, novel.favorites);
        Self {
            novel,
            author,
            status,
            favorite,
        }
    }

    /// Whether the novel is in the viewer's favorites (local view).
    pub fn is_favorite(&self) -> bool {
        self.favorite.state().is_favorite
    }

    /// Favorite counter (local view).
    pub fn favorites(&self) -> u64 {
        self.favorite.state().favorites
    }

    /// Toggle favorite status optimistically.
    pub async fn toggle_favorite(&mut self, api: &ApiClient) -> Notice {
        let notice = self.favorite.toggle(api, &self.novel).await;
        self.novel.favorites = self.favorite.state().favorites;
        notice
    }

    /// Chapters in ascending or descending order.
    pub fn chapters(&self, ascending: bool) -> Vec<&ChapterSummary> {
        let mut list: Vec<&ChapterSummary> = self.novel.chapters.iter().collect();
        list.sort_by_key(|c| c.number);
        if !ascending {
            list.reverse();
        }
        list
    }

    /// Whether a chapter counts as read.
    pub fn is_read(&self, number: u32) -> bool {
        number <= self.status.max_read()
    }

    /// Chapter the "read" button opens, or a notice when there is none.
    pub fn resume(&self) -> std::result::Result<u32, Notice> {
        let count = self.novel.chapters.len() as u32;
        if count == 0 {
            return Err(Notice::info("No chapters available yet"));
        }
        Ok(resume_target(self.status.last_read(), count))
    }

    /// Whether `user` may edit this novel.
    pub fn can_edit(&self, user: Option<&User>) -> bool {
        user.is_some_and(|u| u.owns(&self.novel))
    }

    /// Delete a chapter (owners only) and report the outcome.
    pub async fn delete_chapter(&mut self, api: &ApiClient, number: u32) -> Notice {
        match api.delete_chapter(&self.novel.id, number).await {
            Ok(()) => {
                self.novel.chapters.retain(|c| c.number != number);
                Notice::success("Chapter deleted")
            }
            Err(e) => {
                tracing::warn!(error = %e, number, "Chapter delete failed");
                Notice::error(e.user_message("Delete failed"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn novel_with_chapters(n: u32) -> Novel {
        Novel {
            id: "n1".to_string(),
            title: "Novel".to_string(),
            chapters: (1..=n)
                .rev()
                .map(|number| ChapterSummary {
                    number,
                    title: format!("Chapter {}", number),
                })
                .collect(),
            favorites: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_resume_target() {
        assert_eq!(resume_target(0, 10), 1);
        assert_eq!(resume_target(3, 10), 4);
        assert_eq!(resume_target(10, 10), 10);
        // Progress beyond the list (chapters deleted) starts over.
        assert_eq!(resume_target(12, 10), 1);
    }

    #[test]
    fn test_resume_without_chapters_is_notice() {
        let detail = NovelDetail::new(novel_with_chapters(0), None, ReadingStatus::default());
        let notice = detail.resume().unwrap_err();
        assert!(!notice.is_error());
    }

    #[test]
    fn test_read_marks_and_sorting() {
        let status = ReadingStatus {
            is_favorite: true,
            last_chapter_id: Some(2),
            max_read_chapter_id: Some(3),
        };
        let detail = NovelDetail::new(novel_with_chapters(5), None, status);

        assert!(detail.is_read(3));
        assert!(!detail.is_read(4));
        assert_eq!(detail.resume().unwrap(), 3);
        assert!(detail.is_favorite());
        assert_eq!(detail.favorites(), 2);

        let asc: Vec<u32> = detail.chapters(true).iter().map(|c| c.number).collect();
        assert_eq!(asc, vec![1, 2, 3, 4, 5]);
        let desc: Vec<u32> = detail.chapters(false).iter().map(|c| c.number).collect();
        assert_eq!(desc, vec![5, 4, 3, 2, 1]);
    }
}
