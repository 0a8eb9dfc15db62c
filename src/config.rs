use crate::models::{LibraryKind, NovelStatus, Role};
use crate::screens::home::TrendingRange;
use crate::screens::library::SortKey;
use crate::settings::{Font, Theme};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal client for the Zeuz novel platform.
#[derive(Parser, Debug, Clone)]
#[command(name = "zeuz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file.
    #[arg(short, long, env = "ZEUZ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a default config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },

    /// Log in with email and password.
    Login {
        /// Account email.
        #[arg(short, long)]
        email: String,
        /// Password (will prompt if not provided).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Print the Google sign-in URL.
    GoogleLogin {
        /// Redirect URI the server should send the token to.
        #[arg(long, default_value = "zeuz://auth")]
        redirect: String,
    },

    /// Store a token obtained out of band (e.g. Google sign-in).
    Token {
        /// Bearer token.
        token: String,
    },

    /// Forget the stored token.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Featured, trending and recently updated novels.
    Home {
        /// Trending window.
        #[arg(short, long, value_enum, default_value = "day")]
        trending: TrendingRange,
    },

    /// Browse the catalogue with filters.
    Browse {
        /// Category id (`all` for every category).
        #[arg(long, default_value = "all")]
        category: String,
        /// Publication status.
        #[arg(short, long)]
        status: Option<NovelStatus>,
        /// Sort order.
        #[arg(long, value_enum, default_value = "chapters-desc")]
        sort: SortKey,
        /// Free-text search.
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Page number.
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Search novels by title.
    Search {
        /// Search terms.
        query: String,
        /// Open the N-th result (1-based) and remember the query.
        #[arg(short, long)]
        open: Option<usize>,
    },

    /// Show or clear recent searches.
    History {
        /// Clear the history.
        #[arg(long)]
        clear: bool,
    },

    /// Show a novel with its chapters and your progress.
    Novel {
        /// Novel id.
        id: String,
    },

    /// Read a chapter.
    Read {
        /// Novel id.
        id: String,
        /// Chapter number (defaults to where you left off).
        chapter: Option<u32>,
        /// Print the chapter and exit instead of paging.
        #[arg(long)]
        once: bool,
    },

    /// Toggle a novel in your favorites.
    Favorite {
        /// Novel id.
        id: String,
    },

    /// Favorited novels with new chapters.
    Notifications,

    /// Your reading history or favorites.
    Library {
        /// Which list to show.
        #[arg(short, long, value_enum, default_value = "history")]
        kind: LibraryKind,
        /// Another user's id (when their history is public).
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Profile statistics.
    Profile {
        /// User id to view instead of yourself.
        #[arg(long)]
        user_id: Option<String>,
        /// User email to view instead of yourself.
        #[arg(long, conflicts_with = "user_id")]
        email: Option<String>,
    },

    /// Edit your profile.
    EditProfile {
        /// New display name.
        #[arg(long)]
        name: Option<String>,
        /// New biography.
        #[arg(long)]
        bio: Option<String>,
        /// Make reading history visible to others.
        #[arg(long)]
        public_history: Option<bool>,
        /// Upload an avatar image.
        #[arg(long)]
        picture: Option<PathBuf>,
        /// Upload a banner image.
        #[arg(long)]
        banner: Option<PathBuf>,
    },

    /// Show or change reader settings.
    Settings {
        /// Font size (clamped to 14-32).
        #[arg(long, allow_negative_numbers = true)]
        font_size: Option<i64>,
        /// Increase font size by one step.
        #[arg(long, conflicts_with = "font_size")]
        bigger: bool,
        /// Decrease font size by one step.
        #[arg(long, conflicts_with_all = ["font_size", "bigger"])]
        smaller: bool,
        /// Background theme.
        #[arg(long, value_enum)]
        theme: Option<Theme>,
        /// Font family.
        #[arg(long, value_enum)]
        font: Option<Font>,
    },

    /// Authoring and moderation console.
    Admin {
        /// Admin subcommand action.
        #[command(subcommand)]
        action: AdminCommand,
    },
}

/// Authoring and moderation subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Dashboard counters.
    Stats,

    /// Novels you published.
    Works,

    /// Create a novel.
    CreateNovel(NovelArgs),

    /// Update a novel.
    UpdateNovel {
        /// Novel id.
        id: String,
        /// New values.
        #[command(flatten)]
        novel: NovelArgs,
    },

    /// Delete a novel and all its chapters.
    DeleteNovel {
        /// Novel id.
        id: String,
    },

    /// Add a chapter (number defaults to the next free one).
    AddChapter {
        /// Novel id.
        novel: String,
        /// Chapter number.
        #[arg(short, long)]
        number: Option<u32>,
        /// Chapter title.
        #[arg(short, long)]
        title: String,
        /// File holding the chapter text.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace a chapter's title and text.
    EditChapter {
        /// Novel id.
        novel: String,
        /// Chapter number.
        number: u32,
        /// Chapter title.
        #[arg(short, long)]
        title: String,
        /// File holding the chapter text.
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete a chapter.
    DeleteChapter {
        /// Novel id.
        novel: String,
        /// Chapter number.
        number: u32,
    },

    /// Upload a ZIP of chapter files.
    BulkUpload {
        /// Novel id.
        novel: String,
        /// ZIP archive.
        zip: PathBuf,
    },

    /// List users.
    Users,

    /// Change a user's role.
    Role {
        /// User id.
        user: String,
        /// New role.
        role: Role,
    },

    /// Delete a user.
    DeleteUser {
        /// User id.
        user: String,
    },

    /// Upload an image and print its URL.
    Upload {
        /// Image file.
        image: PathBuf,
    },
}

/// Novel form fields.
#[derive(clap::Args, Debug, Clone)]
pub struct NovelArgs {
    /// Title.
    #[arg(long)]
    pub title: String,
    /// Cover URL.
    #[arg(long, required_unless_present = "cover_file")]
    pub cover: Option<String>,
    /// Cover image to upload.
    #[arg(long)]
    pub cover_file: Option<PathBuf>,
    /// Synopsis.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Tag (repeatable; the first one is the category).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Publication status.
    #[arg(long, default_value = "ongoing")]
    pub status: NovelStatus,
}

/// Main configuration from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Catalogue browsing configuration.
    #[serde(default)]
    pub library: LibraryConfig,
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Zeuz backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (0 keeps the HTTP client default).
    #[serde(default)]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: 0,
        }
    }
}

fn default_base_url() -> String {
    "https://chatzeusb.vercel.app".to_string()
}

/// Local storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite store holding token, settings and history.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("zeuz-reader").join("store.db"))
        .unwrap_or_else(|| PathBuf::from("data/store.db"))
}

/// Catalogue browsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Novels per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}

impl Config {
    /// Load configuration from file.
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            crate::error::AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(crate::error::AppError::Config(format!(
                "api.base_url must be an http(s) URL, got {}",
                self.api.base_url
            )));
        }
        if self.library.page_size == 0 {
            return Err(crate::error::AppError::Config(
                "library.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Find config file in default locations.
    pub fn find_config_file() -> Option<PathBuf> {
        let candidates = [
            PathBuf::from("zeuz.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("zeuz-reader").join("config.toml"))
                .unwrap_or_default(),
        ];

        candidates
            .into_iter()
            .find(|p| !p.as_os_str().is_empty() && p.exists())
    }

    /// Default location written by `init`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("zeuz-reader").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("zeuz.toml"))
    }

    /// Generate default config file content.
    pub fn generate_default() -> String {
        r#"# zeuz-reader configuration

[api]
base_url = "https://chatzeusb.vercel.app"
# Request timeout in seconds (0 keeps the HTTP client default)
timeout_seconds = 0

[storage]
# Token, reader settings and search history live here
# path = "/home/me/.local/share/zeuz-reader/store.db"

[library]
# Novels per page when browsing
page_size = 20
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_default_parses() {
        let config: Config = toml::from_str(&Config::generate_default()).unwrap();
        assert_eq!(config.api.base_url, "https://chatzeusb.vercel.app");
        assert_eq!(config.api.timeout_seconds, 0);
        assert_eq!(config.library.page_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"http://localhost:3000\"\n").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.library.page_size, 20);
    }

    #[test]
    fn test_load_rejects_bad_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"ftp://nope\"\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_cli_parses_browse_filters() {
        let cli = Cli::try_parse_from([
            "zeuz", "browse", "--category", "fantasy", "--status", "completed", "--sort",
            "title-asc", "--page", "3",
        ])
        .unwrap();

        match cli.command {
            Command::Browse {
                category,
                status,
                sort,
                page,
                ..
            } => {
                assert_eq!(category, "fantasy");
                assert_eq!(status, Some(NovelStatus::Completed));
                assert_eq!(sort, SortKey::TitleAsc);
                assert_eq!(page, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
