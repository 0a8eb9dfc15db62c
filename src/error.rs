use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the client.
#[derive(Error, Debug)]
pub enum AppError {
    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Server-provided `message`, or the status reason.
        message: String,
    },

    /// Transport-level HTTP failure (connect, TLS, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No auth token is available for an authenticated call.
    #[error("Not logged in")]
    NotAuthenticated,

    /// Caller input rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Local store error.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Message suitable for a user-facing notice.
    ///
    /// API errors show the server message; everything else falls back to
    /// the provided generic text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Whether the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AppError::NotAuthenticated => true,
            AppError::Api { status, .. } => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, AppError>;
