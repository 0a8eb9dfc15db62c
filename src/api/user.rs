//! Account endpoints: login, current user, profile, uploads.

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{CurrentUserResponse, LoginResponse, ProfileUpdate, UploadResponse, User, UserStats};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Whose statistics to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTarget<'a> {
    /// The logged-in user.
    Me,
    /// Another user by id.
    Id(&'a str),
    /// Another user by email.
    Email(&'a str),
}

impl ApiClient {
    /// `POST /auth/login`. Returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let response: LoginResponse = self
            .send_json_for(Method::POST, "/auth/login", &LoginRequest { email, password })
            .await?;

        response
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Login response carried no token".to_string()))
    }

    /// URL that starts the Google sign-in flow in a browser.
    pub fn google_login_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/auth/google?redirect_uri={}",
            self.base_url(),
            urlencoding::encode(redirect_uri)
        )
    }

    /// `GET /api/user`.
    pub async fn current_user(&self) -> Result<User> {
        if !self.has_token() {
            return Err(AppError::NotAuthenticated);
        }
        let response: CurrentUserResponse = self.get_json("/api/user").await?;
        Ok(response.user)
    }

    /// `GET /api/user/stats`, for self or another user.
    pub async fn user_stats(&self, target: StatsTarget<'_>) -> Result<UserStats> {
        let query: Vec<(&str, &str)> = match target {
            StatsTarget::Me => Vec::new(),
            StatsTarget::Id(id) => vec![("userId", id)],
            StatsTarget::Email(email) => vec![("email", email)],
        };
        self.get_query("/api/user/stats", &query).await
    }

    /// `PUT /api/user/profile`.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        self.send_json(Method::PUT, "/api/user/profile", update)
            .await?;
        Ok(())
    }

    /// `POST /api/upload` (multipart `image`). Returns the public URL.
    pub async fn upload_image(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.jpg")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(name)
            .mime_str(image_mime(path))?;
        let form = Form::new().part("image", part);

        let response = self
            .send(self.request(Method::POST, "/api/upload").multipart(form))
            .await?;
        let body: UploadResponse = response.json().await?;

        tracing::info!(url = %body.url, "Uploaded image");
        Ok(body.url)
    }
}

fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_login_url_encodes_redirect() {
        let client = ApiClient::with_base_url("https://api.example.com").unwrap();
        assert_eq!(
            client.google_login_url("zeuz://auth"),
            "https://api.example.com/auth/google?redirect_uri=zeuz%3A%2F%2Fauth"
        );
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("noext")), "image/jpeg");
    }
}
