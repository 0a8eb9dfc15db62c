//! Screen controllers.
//!
//! Each controller owns the ephemeral copy of the server data it shows and
//! follows the same contract: `Loading`, then `Loaded(data)` or `Error`.
//! Data is refetched wholesale whenever the screen regains focus or its
//! inputs change; there is no incremental diffing.

/// Authoring and moderation console.
pub mod admin;
/// ZIP chapter upload.
pub mod bulk;
/// Novel detail.
pub mod detail;
/// Home shelves.
pub mod home;
/// Catalogue browser.
pub mod library;
/// User profiles.
pub mod profile;
/// Chapter reader.
pub mod reader;
/// Title search.
pub mod search;

use crate::error::Result;

/// Three-state lifecycle of a screen's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScreenState<T> {
    /// A fetch is in progress (or has not started).
    #[default]
    Loading,
    /// Data is available.
    Loaded(T),
    /// The last fetch failed.
    Error(String),
}

impl<T> ScreenState<T> {
    /// Map a fetch result, logging failures and showing `fallback`.
    pub fn from_result(result: Result<T>, fallback: &str) -> Self {
        match result {
            Ok(data) => ScreenState::Loaded(data),
            Err(e) => {
                tracing::warn!(error = %e, "{}", fallback);
                ScreenState::Error(e.user_message(fallback))
            }
        }
    }

    /// Loaded data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            ScreenState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable loaded data, if any.
    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            ScreenState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Error message, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            ScreenState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Whether a fetch is pending.
    pub fn is_loading(&self) -> bool {
        matches!(self, ScreenState::Loading)
    }
}
