//! # Bookmark Persistence Module
//!
//! Owns the locally bookmarked copies of remote playlists and provides the
//! store contract the reconciliation pipeline runs against.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite schema and migrations for the `remote_playlists` table
//! - The [`BookmarkStore`] async contract (lookup/insert/update/delete plus
//!   change notifications)
//! - The [`SqliteBookmarkStore`] implementation backed by a pooled `sqlx`
//!   connection
//!
//! At most one [`BookmarkRecord`] exists per playlist identity; the schema
//! enforces this with a unique index over `(service_id, url)`.

pub mod db;
pub mod error;
pub mod models;
pub mod store;

pub use db::{create_pool, create_test_pool, DatabaseConfig};
pub use error::{BookmarkError, Result};
pub use models::{BookmarkRecord, PlaylistSnapshot};
pub use store::{BookmarkStore, SqliteBookmarkStore};
