//! Wire models consumed from the Zeuz API.
//!
//! The server owns every one of these entities; the client only keeps
//! short-lived copies per screen visit.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Keys a novel id may arrive under, in order of preference.
const NOVEL_ID_KEYS: [&str; 3] = ["_id", "id", "novelId"];

/// Decode a field that the server may send as `null`, falling back to the
/// type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Publication status of a novel.
///
/// The server emits either the English ids or the localized labels; anything
/// unrecognised is treated as ongoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NovelStatus {
    /// Still receiving chapters.
    #[default]
    Ongoing,
    /// Finished.
    Completed,
    /// Dropped or on hiatus.
    Stopped,
}

impl NovelStatus {
    /// All statuses, in display order.
    pub const ALL: [NovelStatus; 3] = [
        NovelStatus::Ongoing,
        NovelStatus::Completed,
        NovelStatus::Stopped,
    ];

    /// Wire id used in queries and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Ongoing => "ongoing",
            NovelStatus::Completed => "completed",
            NovelStatus::Stopped => "stopped",
        }
    }

    /// Parse a wire id or localized label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "ongoing" | "مستمرة" => Some(NovelStatus::Ongoing),
            "completed" | "مكتملة" => Some(NovelStatus::Completed),
            "stopped" | "متوقفة" => Some(NovelStatus::Stopped),
            _ => None,
        }
    }
}

impl From<String> for NovelStatus {
    fn from(value: String) -> Self {
        NovelStatus::parse(&value).unwrap_or_default()
    }
}

impl From<NovelStatus> for String {
    fn from(value: NovelStatus) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for NovelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NovelStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NovelStatus::parse(s).ok_or_else(|| format!("unknown status: {}", s))
    }
}

/// User role. The server spells the reader role `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Plain reader.
    #[default]
    Reader,
    /// May publish and edit their own novels.
    Contributor,
    /// Full moderation rights.
    Admin,
}

impl Role {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "user",
            Role::Contributor => "contributor",
            Role::Admin => "admin",
        }
    }

    /// Whether this role may reach the authoring console.
    pub fn can_publish(&self) -> bool {
        matches!(self, Role::Contributor | Role::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "contributor" => Role::Contributor,
            _ => Role::Reader,
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "user" | "reader" => Ok(Role::Reader),
            "contributor" => Ok(Role::Contributor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Chapter entry in a novel's denormalized chapter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterSummary {
    /// 1-based, author-assigned chapter number.
    pub number: u32,
    /// Chapter title.
    #[serde(default)]
    pub title: String,
}

/// A serialized novel.
///
/// Deserialization takes the id from the first non-empty of `_id`, `id` and
/// `novelId`, and treats `null` scalars as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Novel {
    /// Server id.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Cover image URL.
    #[serde(default)]
    pub cover: Option<String>,
    /// Author or translator display name.
    #[serde(default)]
    pub author: Option<String>,
    /// Email of the publishing account.
    #[serde(default)]
    pub author_email: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Primary category.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form tags.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Publication status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: NovelStatus,
    /// Total views.
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: u64,
    /// Number of users who favorited the novel.
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorites: u64,
    /// Chapter list (only present on detail responses).
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<ChapterSummary>,
    /// Chapter count as reported on list responses.
    #[serde(default)]
    pub chapters_count: Option<u32>,
    /// Last time a chapter was added.
    #[serde(default)]
    pub last_chapter_update: Option<DateTime<Utc>>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Serialize for Novel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Novel::serialize(self, serializer)
    }
}

impl<'de> Deserialize<'de> for Novel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut fields: serde_json::Map<String, Value> = Deserialize::deserialize(deserializer)?;
        let candidates: Vec<Value> = NOVEL_ID_KEYS
            .iter()
            .filter_map(|key| fields.remove(*key))
            .collect();

        let mut novel = Novel::deserialize(Value::Object(fields)).map_err(D::Error::custom)?;
        novel.id = candidates
            .into_iter()
            .find_map(|value| match value {
                Value::String(id) if !id.is_empty() => Some(id),
                _ => None,
            })
            .unwrap_or_default();
        Ok(novel)
    }
}

impl Novel {
    /// Number of chapters, preferring the loaded list.
    pub fn chapter_count(&self) -> u32 {
        if self.chapters.is_empty() {
            self.chapters_count.unwrap_or(0)
        } else {
            self.chapters.len() as u32
        }
    }
}

/// Chapter body as returned by `GET /api/novels/:id/chapters/:number`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    /// Chapter number, when echoed by the server.
    #[serde(default)]
    pub number: Option<u32>,
    /// Chapter title.
    #[serde(default)]
    pub title: String,
    /// Plain text with newline-delimited paragraphs.
    #[serde(default)]
    pub content: String,
    /// Total chapters of the novel at fetch time.
    #[serde(default)]
    pub total_chapters: Option<u32>,
}

impl ChapterContent {
    /// Non-blank paragraphs, in order.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// A platform account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Server id.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Role.
    #[serde(default)]
    pub role: Role,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
    /// Profile banner URL.
    #[serde(default)]
    pub banner: Option<String>,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Whether other users may see the reading history.
    #[serde(default)]
    pub is_history_public: bool,
    /// Account creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this user may edit the given novel.
    ///
    /// Admins own everything. Otherwise the novel's author email must match;
    /// novels published before author emails were recorded fall back to a
    /// case-insensitive author name match.
    pub fn owns(&self, novel: &Novel) -> bool {
        if self.role == Role::Admin {
            return true;
        }
        match (&novel.author_email, &novel.author) {
            (Some(email), _) => !email.is_empty() && *email == self.email,
            (None, Some(author)) => author.to_lowercase() == self.name.to_lowercase(),
            (None, None) => false,
        }
    }
}

/// Which half of a user's library to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LibraryKind {
    /// Recently read novels.
    History,
    /// Favorited novels.
    Favorites,
}

impl LibraryKind {
    /// Query value.
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryKind::History => "history",
            LibraryKind::Favorites => "favorites",
        }
    }
}

/// One row of a user's library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// Novel id.
    #[serde(default, deserialize_with = "null_as_default")]
    pub novel_id: String,
    /// Novel title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Cover URL.
    #[serde(default)]
    pub cover: Option<String>,
    /// Author.
    #[serde(default)]
    pub author: Option<String>,
    /// Last chapter opened.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_chapter_id: u32,
    /// Title of the last chapter opened.
    #[serde(default)]
    pub last_chapter_title: Option<String>,
    /// Completion percentage.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: f64,
    /// Favorite flag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_favorite: bool,
    /// Last time the novel was opened.
    #[serde(default)]
    pub last_read_at: Option<DateTime<Utc>>,
}

impl LibraryEntry {
    /// Progress clamped to a displayable percentage.
    pub fn progress_percent(&self) -> u8 {
        self.progress.clamp(0.0, 100.0).round() as u8
    }

    /// Label for the last chapter read.
    pub fn last_chapter_label(&self) -> String {
        match &self.last_chapter_title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Chapter {}", self.last_chapter_id),
        }
    }
}

/// Per-user state for one novel (`GET /api/novel/status/:id`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStatus {
    /// Favorite flag.
    #[serde(default)]
    pub is_favorite: bool,
    /// Last chapter opened.
    #[serde(default)]
    pub last_chapter_id: Option<u32>,
    /// Furthest chapter ever opened.
    #[serde(default)]
    pub max_read_chapter_id: Option<u32>,
}

impl ReadingStatus {
    /// Last chapter opened, 0 when never read.
    pub fn last_read(&self) -> u32 {
        self.last_chapter_id.unwrap_or(0)
    }

    /// Furthest chapter read, falling back to the last one opened.
    pub fn max_read(&self) -> u32 {
        self.max_read_chapter_id
            .filter(|n| *n > 0)
            .unwrap_or_else(|| self.last_read())
    }
}

/// A favorited novel with chapters the user has not read yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Novel id as `_id`.
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Novel id as `novelId` (some responses use this instead).
    #[serde(default)]
    pub novel_id: Option<String>,
    /// Novel title.
    #[serde(default)]
    pub title: String,
    /// Cover URL.
    #[serde(default)]
    pub cover: Option<String>,
    /// Unread chapters for this novel.
    #[serde(default)]
    pub new_chapters_count: u32,
    /// Time of the newest chapter.
    #[serde(default)]
    pub last_chapter_update: Option<DateTime<Utc>>,
}

impl Notification {
    /// Id of the novel this notification points at.
    pub fn target_id(&self) -> &str {
        if !self.id.is_empty() {
            &self.id
        } else {
            self.novel_id.as_deref().unwrap_or_default()
        }
    }
}

/// Body of `GET /api/notifications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    /// Novels with unread chapters.
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Total unread chapters across all novels.
    #[serde(default)]
    pub total_unread: u32,
}

/// One page of novels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelPage {
    /// Novels on this page.
    #[serde(default)]
    pub novels: Vec<Novel>,
    /// Number of pages for the current filters.
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    /// Total novels for the current filters.
    #[serde(default)]
    pub total_novels: u64,
}

fn default_total_pages() -> u32 {
    1
}

impl Default for NovelPage {
    fn default() -> Self {
        Self {
            novels: Vec::new(),
            total_pages: default_total_pages(),
            total_novels: 0,
        }
    }
}

/// `GET /api/novels` answers either with a page object or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NovelListBody {
    Page(NovelPage),
    List(Vec<Novel>),
}

impl From<NovelListBody> for NovelPage {
    fn from(body: NovelListBody) -> Self {
        match body {
            NovelListBody::Page(page) => page,
            NovelListBody::List(novels) => NovelPage {
                total_novels: novels.len() as u64,
                novels,
                total_pages: 1,
            },
        }
    }
}

/// Body of `GET /api/user/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Profile of the requested user (absent for self on older servers).
    #[serde(default)]
    pub user: Option<User>,
    /// Novels published by the user.
    #[serde(default)]
    pub my_works: Vec<Novel>,
    /// Chapters read.
    #[serde(default)]
    pub read_chapters: u64,
    /// Chapters published.
    #[serde(default)]
    pub added_chapters: u64,
    /// Views across the user's works.
    #[serde(default)]
    pub total_views: u64,
}

/// Result of a ZIP chapter upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadReport {
    /// Chapters created.
    #[serde(default)]
    pub success_count: u32,
    /// Per-file error messages, in server order.
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Body of `POST /api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored image.
    pub url: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token, absent when the server refuses silently.
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `GET /api/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    /// The authenticated user.
    pub user: User,
}

/// Error body returned by the server on failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/novel/update` payload.
///
/// The same endpoint records reading progress and favorite changes; unset
/// fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryUpdate {
    /// Novel id.
    pub novel_id: String,
    /// Novel title.
    pub title: String,
    /// Cover URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Chapter just opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chapter_id: Option<u32>,
    /// Title of the chapter just opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_chapter_title: Option<String>,
    /// New favorite flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

impl LibraryUpdate {
    /// Payload carrying the novel's identity only.
    pub fn for_novel(novel: &Novel) -> Self {
        Self {
            novel_id: novel.id.clone(),
            title: novel.title.clone(),
            cover: novel.cover.clone(),
            author: novel.author.clone(),
            ..Default::default()
        }
    }
}

/// Novel create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelPayload {
    /// Title.
    pub title: String,
    /// Cover URL.
    pub cover: String,
    /// Synopsis.
    pub description: String,
    /// Primary category (first tag).
    pub category: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Status.
    pub status: NovelStatus,
}

/// Chapter create payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    /// Target novel.
    pub novel_id: String,
    /// Chapter number.
    pub number: u32,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
}

/// Chapter update payload.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterUpdate {
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
}

/// Profile update payload; unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// History visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_history_public: Option<bool>,
    /// Avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Banner URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

/// Compact count for display (`1.5K`, `2.3M`).
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Relative time label ("3 days ago") against `now`.
pub fn time_ago(when: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(when) = when else {
        return "soon".to_string();
    };
    let seconds = (now - when).num_seconds().max(0);

    const UNITS: [(i64, &str); 5] = [
        (31_536_000, "year"),
        (2_592_000, "month"),
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
    ];

    for (size, unit) in UNITS {
        let count = seconds / size;
        // Strictly more than one whole unit.
        if seconds > size {
            let plural = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, unit, plural);
        }
    }
    "just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_accepts_localized_labels() {
        let novel: Novel =
            serde_json::from_str(r#"{"_id":"n1","title":"T","status":"مكتملة"}"#).unwrap();
        assert_eq!(novel.status, NovelStatus::Completed);

        let novel: Novel =
            serde_json::from_str(r#"{"_id":"n1","title":"T","status":"stopped"}"#).unwrap();
        assert_eq!(novel.status, NovelStatus::Stopped);

        let novel: Novel =
            serde_json::from_str(r#"{"_id":"n1","title":"T","status":"weird"}"#).unwrap();
        assert_eq!(novel.status, NovelStatus::Ongoing);
    }

    #[test]
    fn test_novel_id_from_any_key() {
        let novel: Novel = serde_json::from_str(r#"{"_id":"n1","id":"n1","title":"T"}"#).unwrap();
        assert_eq!(novel.id, "n1");

        let novel: Novel = serde_json::from_str(r#"{"novelId":"n2","title":"T"}"#).unwrap();
        assert_eq!(novel.id, "n2");

        let novel: Novel = serde_json::from_str(r#"{"_id":"","id":"n3"}"#).unwrap();
        assert_eq!(novel.id, "n3");

        let json = serde_json::to_value(&novel).unwrap();
        assert_eq!(json["_id"], "n3");
    }

    #[test]
    fn test_null_scalars_fall_back_to_defaults() {
        let page: NovelPage = serde_json::from_str(
            r#"{"novels":[
                {"_id":"n1","title":"A","status":null,"views":null,"tags":null},
                {"_id":"n2","title":"B","status":"completed"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(page.novels.len(), 2);
        assert_eq!(page.novels[0].status, NovelStatus::Ongoing);
        assert_eq!(page.novels[0].views, 0);
        assert!(page.novels[0].tags.is_empty());
        assert_eq!(page.novels[1].status, NovelStatus::Completed);

        let entry: LibraryEntry = serde_json::from_str(
            r#"{"novelId":"n1","title":"A","lastChapterId":null,"progress":null}"#,
        )
        .unwrap();
        assert_eq!(entry.novel_id, "n1");
        assert_eq!(entry.last_chapter_id, 0);
    }

    #[test]
    fn test_novel_list_body_accepts_bare_array() {
        let body: NovelListBody =
            serde_json::from_str(r#"[{"_id":"a","title":"A"},{"_id":"b","title":"B"}]"#).unwrap();
        let page = NovelPage::from(body);
        assert_eq!(page.novels.len(), 2);
        assert_eq!(page.total_pages, 1);

        let body: NovelListBody =
            serde_json::from_str(r#"{"novels":[{"_id":"a"}],"totalPages":7}"#).unwrap();
        let page = NovelPage::from(body);
        assert_eq!(page.total_pages, 7);
    }

    #[test]
    fn test_role_wire_names() {
        let user: User = serde_json::from_str(r#"{"_id":"u","role":"user"}"#).unwrap();
        assert_eq!(user.role, Role::Reader);
        assert_eq!(serde_json::to_string(&Role::Contributor).unwrap(), "\"contributor\"");
        assert!(Role::Admin.can_publish());
        assert!(!Role::Reader.can_publish());
    }

    #[test]
    fn test_ownership_rules() {
        let mut user = User {
            name: "Layla".to_string(),
            email: "layla@example.com".to_string(),
            ..Default::default()
        };
        let mut novel = Novel {
            author: Some("layla".to_string()),
            ..Default::default()
        };

        // Legacy novels match on name.
        assert!(user.owns(&novel));

        // Once an email is recorded, the name no longer counts.
        novel.author_email = Some("someone@example.com".to_string());
        assert!(!user.owns(&novel));

        user.role = Role::Admin;
        assert!(user.owns(&novel));
    }

    #[test]
    fn test_reading_status_max_read_falls_back() {
        let status = ReadingStatus {
            is_favorite: false,
            last_chapter_id: Some(4),
            max_read_chapter_id: None,
        };
        assert_eq!(status.max_read(), 4);
        assert_eq!(ReadingStatus::default().max_read(), 0);
    }

    #[test]
    fn test_library_update_skips_unset_fields() {
        let update = LibraryUpdate {
            novel_id: "n1".to_string(),
            title: "T".to_string(),
            is_favorite: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["novelId"], "n1");
        assert_eq!(json["isFavorite"], true);
        assert!(json.get("lastChapterId").is_none());
    }

    #[test]
    fn test_paragraphs_skip_blank_lines() {
        let chapter = ChapterContent {
            content: "First\n\n   \nSecond\nThird  ".to_string(),
            ..Default::default()
        };
        assert_eq!(chapter.paragraphs(), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_500), "1.5K");
        assert_eq!(format_count(2_300_000), "2.3M");
    }

    #[test]
    fn test_time_ago() {
        let now = Utc::now();
        assert_eq!(time_ago(None, now), "soon");
        assert_eq!(time_ago(Some(now - Duration::seconds(30)), now), "just now");
        assert_eq!(time_ago(Some(now - Duration::hours(5)), now), "5 hours ago");
        assert_eq!(time_ago(Some(now - Duration::days(3)), now), "3 days ago");
    }

    #[test]
    fn test_progress_percent_clamps() {
        let entry = LibraryEntry {
            progress: 140.0,
            ..Default::default()
        };
        assert_eq!(entry.progress_percent(), 100);
        assert_eq!(entry.last_chapter_label(), "Chapter 0");
    }
}
