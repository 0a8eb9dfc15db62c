//! Reader-facing endpoints: catalogue, chapters, library, notifications.

use super::{ApiClient, segment};
use crate::error::Result;
use crate::models::{
    ChapterContent, LibraryEntry, LibraryKind, LibraryUpdate, Novel, NovelListBody, NovelPage,
    NotificationsResponse, ReadingStatus,
};
use reqwest::Method;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewRequest {
    chapter_number: Option<u32>,
}

impl ApiClient {
    /// `GET /api/novels` with the given query pairs.
    pub async fn list_novels(&self, query: &[(&str, String)]) -> Result<NovelPage> {
        let body: NovelListBody = self.get_query("/api/novels", query).await?;
        Ok(body.into())
    }

    /// `GET /api/novels/:id`, including the chapter list.
    pub async fn novel(&self, novel_id: &str) -> Result<Novel> {
        self.get_json(&format!("/api/novels/{}", segment(novel_id)))
            .await
    }

    /// `GET /api/novels/:id/chapters/:number`.
    pub async fn chapter(&self, novel_id: &str, number: u32) -> Result<ChapterContent> {
        self.get_json(&format!(
            "/api/novels/{}/chapters/{}",
            segment(novel_id),
            number
        ))
        .await
    }

    /// `POST /api/novels/:id/view`.
    pub async fn increment_view(&self, novel_id: &str, chapter_number: Option<u32>) -> Result<()> {
        self.send_json(
            Method::POST,
            &format!("/api/novels/{}/view", segment(novel_id)),
            &ViewRequest { chapter_number },
        )
        .await?;
        Ok(())
    }

    /// `POST /api/novel/update`: progress and favorite changes.
    pub async fn update_library(&self, update: &LibraryUpdate) -> Result<()> {
        self.send_json(Method::POST, "/api/novel/update", update)
            .await?;
        Ok(())
    }

    /// `GET /api/novel/library?type=..[&userId=..]`.
    pub async fn library(
        &self,
        kind: LibraryKind,
        user_id: Option<&str>,
    ) -> Result<Vec<LibraryEntry>> {
        let mut query = vec![("type", kind.as_str().to_string())];
        if let Some(user_id) = user_id {
            query.push(("userId", user_id.to_string()));
        }
        self.get_query("/api/novel/library", &query).await
    }

    /// `GET /api/novel/status/:novelId`.
    pub async fn reading_status(&self, novel_id: &str) -> Result<ReadingStatus> {
        self.get_json(&format!("/api/novel/status/{}", segment(novel_id)))
            .await
    }

    /// `GET /api/notifications`.
    pub async fn notifications(&self) -> Result<NotificationsResponse> {
        self.get_json("/api/notifications").await
    }
}
