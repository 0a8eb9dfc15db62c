//! Best-effort view and reading-progress reporting.
//!
//! Opening a chapter fires two independent calls: a view increment and a
//! progress update. Neither is retried, neither is surfaced to the user, and
//! no ordering is kept between them or across rapid navigation; the server
//! keeps whichever write lands last.

use crate::api::ApiClient;
use crate::models::{LibraryUpdate, Novel};
use tokio::task::JoinHandle;

/// What actually reached the server. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// The view increment succeeded.
    pub view_recorded: bool,
    /// The progress update succeeded.
    pub progress_recorded: bool,
}

/// Fires view/progress calls on chapter navigation.
#[derive(Clone)]
pub struct ProgressReporter {
    api: ApiClient,
}

impl ProgressReporter {
    /// Create a reporter over the shared client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Record a view of `chapter_number`. Failures are logged and dropped.
    pub async fn record_view(&self, novel_id: &str, chapter_number: u32) -> bool {
        match self.api.increment_view(novel_id, Some(chapter_number)).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(novel_id, chapter_number, error = %e, "View increment failed");
                false
            }
        }
    }

    /// Record `chapter_number` as the last chapter read. Failures are
    /// logged and dropped.
    pub async fn record_progress(
        &self,
        novel: &Novel,
        chapter_number: u32,
        chapter_title: &str,
    ) -> bool {
        let update = LibraryUpdate {
            last_chapter_id: Some(chapter_number),
            last_chapter_title: Some(chapter_title.to_string()),
            ..LibraryUpdate::for_novel(novel)
        };

        match self.api.update_library(&update).await {
            Ok(()) => {
                tracing::debug!(novel_id = %novel.id, chapter_number, "Progress updated");
                true
            }
            Err(e) => {
                tracing::warn!(novel_id = %novel.id, chapter_number, error = %e, "Progress update failed");
                false
            }
        }
    }

    /// Run both calls concurrently and wait for them.
    pub async fn report(&self, novel: &Novel, chapter_number: u32, chapter_title: &str) -> ReportOutcome {
        let (view_recorded, progress_recorded) = tokio::join!(
            self.record_view(&novel.id, chapter_number),
            self.record_progress(novel, chapter_number, chapter_title),
        );

        ReportOutcome {
            view_recorded,
            progress_recorded,
        }
    }

    /// Fire both calls in the background. The handle may be dropped.
    pub fn spawn_report(
        &self,
        novel: Novel,
        chapter_number: u32,
        chapter_title: String,
    ) -> JoinHandle<ReportOutcome> {
        let reporter = self.clone();
        tokio::spawn(async move {
            reporter
                .report(&novel, chapter_number, &chapter_title)
                .await
        })
    }

    /// Fire a view increment in the background.
    pub fn spawn_view(&self, novel_id: String, chapter_number: u32) -> JoinHandle<bool> {
        let reporter = self.clone();
        tokio::spawn(async move { reporter.record_view(&novel_id, chapter_number).await })
    }
}
