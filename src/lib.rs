//! zeuz-reader: a client for the Zeuz serialized-fiction platform.
//!
//! This crate talks to the Zeuz REST API to browse, search, favorite and
//! read novels, and to drive the authoring/admin console. All durable state
//! lives on the server; the client only keeps the auth token, reader display
//! preferences and recent searches in a small local store.
//!
//! # Features
//!
//! - Catalogue browsing with filters and pagination
//! - Title search with remembered queries
//! - Chapter reader with view and progress reporting
//! - Optimistic favorite toggle with rollback
//! - Unread-chapter notifications
//! - Profiles, reading history and favorites
//! - Novel and chapter publishing, ZIP bulk upload
//! - User moderation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// REST API client.
pub mod api;
/// Login session.
pub mod auth;
/// Configuration and CLI.
pub mod config;
/// Error types.
pub mod error;
/// Favorite toggle.
pub mod favorites;
/// Recent searches.
pub mod history;
/// Wire models.
pub mod models;
/// User-facing notices.
pub mod notice;
/// Notification feed.
pub mod notifications;
/// View and progress reporting.
pub mod progress;
/// Screen controllers.
pub mod screens;
/// Reader display settings.
pub mod settings;
/// Local key-value store.
pub mod store;


pub use api::ApiClient;
pub use auth::Session;
pub use config::{Cli, Command, Config};
pub use error::{AppError, Result};
pub use store::LocalStore;
