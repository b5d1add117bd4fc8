//! Domain models for bookmarked remote playlists.

use core_queue::PlaylistIdentity;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The authoritative remote state of a playlist at a point in time.
///
/// Produced once per successful fetch by the load collaborator; immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSnapshot {
    pub identity: PlaylistIdentity,
    pub name: String,
    pub uploader_name: Option<String>,
    pub uploader_url: Option<String>,
    pub uploader_avatar_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub stream_count: i64,
    /// Continuation token for loading pages beyond the ones fetched so far.
    pub next_page: Option<String>,
    /// Non-fatal errors encountered while fetching; reported, not persisted.
    pub fetch_errors: Vec<String>,
}

impl PlaylistSnapshot {
    pub fn new(identity: PlaylistIdentity, name: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
            uploader_name: None,
            uploader_url: None,
            uploader_avatar_url: None,
            thumbnail_url: None,
            stream_count: 0,
            next_page: None,
            fetch_errors: Vec::new(),
        }
    }

    /// The thumbnail a bookmark stores: the playlist's own thumbnail when
    /// the service provides one, otherwise the uploader avatar.
    pub fn display_thumbnail(&self) -> Option<&str> {
        self.thumbnail_url
            .as_deref()
            .or(self.uploader_avatar_url.as_deref())
    }
}

/// The locally persisted counterpart of a remote playlist.
///
/// Created by `insert`, rewritten by `update` whenever a freshly fetched
/// snapshot differs in any user-visible field, removed by `delete`. The
/// `uid` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookmarkRecord {
    pub uid: i64,
    pub service_id: i32,
    pub url: String,
    pub name: String,
    pub uploader: Option<String>,
    pub thumbnail_url: Option<String>,
    pub stream_count: i64,
    /// Unix seconds of the last time a fetched snapshot touched this record.
    pub last_updated: i64,
}

impl BookmarkRecord {
    pub fn identity(&self) -> PlaylistIdentity {
        PlaylistIdentity::new(self.service_id, self.url.clone())
    }

    /// Field-for-field staleness check against a fetched snapshot.
    ///
    /// Compares every user-visible field; when this holds the reconciliation
    /// pipeline skips the conditional write entirely.
    pub fn is_identical_to(&self, snapshot: &PlaylistSnapshot) -> bool {
        self.service_id == snapshot.identity.service_id
            && self.url == snapshot.identity.url
            && self.name == snapshot.name
            && self.uploader == snapshot.uploader_name
            && self.thumbnail_url.as_deref() == snapshot.display_thumbnail()
            && self.stream_count == snapshot.stream_count
    }
}
