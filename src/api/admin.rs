//! Authoring and moderation endpoints.

use super::{ApiClient, segment};
use crate::error::Result;
use crate::models::{BulkUploadReport, ChapterUpdate, NewChapter, NovelPayload, Role, User};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct RoleRequest {
    role: Role,
}

impl ApiClient {
    /// `POST /api/admin/novels`.
    pub async fn create_novel(&self, payload: &NovelPayload) -> Result<()> {
        self.send_json(Method::POST, "/api/admin/novels", payload)
            .await?;
        Ok(())
    }

    /// `PUT /api/admin/novels/:id`.
    pub async fn update_novel(&self, novel_id: &str, payload: &NovelPayload) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/api/admin/novels/{}", segment(novel_id)),
            payload,
        )
        .await?;
        Ok(())
    }

    /// `DELETE /api/admin/novels/:id`.
    pub async fn delete_novel(&self, novel_id: &str) -> Result<()> {
        self.delete(&format!("/api/admin/novels/{}", segment(novel_id)))
            .await
    }

    /// `POST /api/admin/chapters`.
    pub async fn create_chapter(&self, chapter: &NewChapter) -> Result<()> {
        self.send_json(Method::POST, "/api/admin/chapters", chapter)
            .await?;
        Ok(())
    }

    /// `PUT /api/admin/chapters/:novelId/:number`.
    pub async fn update_chapter(
        &self,
        novel_id: &str,
        number: u32,
        update: &ChapterUpdate,
    ) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/api/admin/chapters/{}/{}", segment(novel_id), number),
            update,
        )
        .await?;
        Ok(())
    }

    /// `DELETE /api/admin/chapters/:novelId/:number`.
    pub async fn delete_chapter(&self, novel_id: &str, number: u32) -> Result<()> {
        self.delete(&format!(
            "/api/admin/chapters/{}/{}",
            segment(novel_id),
            number
        ))
        .await
    }

    /// `POST /api/admin/chapters/bulk-upload` with `novelId` and a `zip` file.
    pub async fn bulk_upload(&self, novel_id: &str, zip_path: &Path) -> Result<BulkUploadReport> {
        let bytes = tokio::fs::read(zip_path).await?;
        let name = zip_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("chapters.zip")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str("application/zip")?;
        let form = Form::new()
            .text("novelId", novel_id.to_string())
            .part("zip", part);

        let response = self
            .send(
                self.request(Method::POST, "/api/admin/chapters/bulk-upload")
                    .multipart(form),
            )
            .await?;
        Ok(response.json().await?)
    }

    /// `GET /api/admin/users`.
    pub async fn users(&self) -> Result<Vec<User>> {
        self.get_json("/api/admin/users").await
    }

    /// `PUT /api/admin/users/:id/role`.
    pub async fn set_user_role(&self, user_id: &str, role: Role) -> Result<()> {
        self.send_json(
            Method::PUT,
            &format!("/api/admin/users/{}/role", segment(user_id)),
            &RoleRequest { role },
        )
        .await?;
        Ok(())
    }

    /// `DELETE /api/admin/users/:id`.
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.delete(&format!("/api/admin/users/{}", segment(user_id)))
            .await
    }
}
