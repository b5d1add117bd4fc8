//! Bookmark store contract and SQLite implementation.

use crate::error::{BookmarkError, Result};
use crate::models::{BookmarkRecord, PlaylistSnapshot};
use async_trait::async_trait;
use core_queue::PlaylistIdentity;
use sqlx::{query, query_as, SqlitePool};
use tokio::sync::broadcast;
use tracing::debug;

/// Bookmark store interface for persisted remote playlists.
///
/// Safe for concurrent asynchronous calls; callers impose no additional
/// locking.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Find the records matching a playlist identity, ordered by uid.
    ///
    /// The schema keeps at most one record per identity, so callers only
    /// ever inspect the first element.
    async fn lookup(&self, identity: &PlaylistIdentity) -> Result<Vec<BookmarkRecord>>;

    /// Persist a new bookmark from a fetched snapshot.
    ///
    /// # Returns
    /// The stored record carrying the store-assigned uid.
    ///
    /// # Errors
    /// Returns an error if a record for the same identity already exists or
    /// a database error occurs.
    async fn insert(&self, snapshot: &PlaylistSnapshot) -> Result<BookmarkRecord>;

    /// Overwrite the user-visible fields of an existing record and refresh
    /// its last-seen timestamp.
    ///
    /// # Errors
    /// Returns [`BookmarkError::NotFound`] if no record has the given uid.
    async fn update(&self, uid: i64, snapshot: &PlaylistSnapshot) -> Result<()>;

    /// Remove a bookmark.
    async fn delete(&self, uid: i64) -> Result<()>;

    /// Change notifications, pulsed after every successful mutation.
    ///
    /// Lets observers re-read the current state when the table changes
    /// underneath them, e.g. a bookmark toggled while a reconciliation is
    /// mid-flight.
    fn changes(&self) -> broadcast::Receiver<()>;
}

/// SQLite implementation of [`BookmarkStore`].
pub struct SqliteBookmarkStore {
    pool: SqlitePool,
    changes: broadcast::Sender<()>,
}

impl SqliteBookmarkStore {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self { pool, changes }
    }

    fn notify_changed(&self) {
        // No receivers is fine; the pulse is best-effort.
        let _ = self.changes.send(());
    }
}

#[async_trait]
impl BookmarkStore for SqliteBookmarkStore {
    async fn lookup(&self, identity: &PlaylistIdentity) -> Result<Vec<BookmarkRecord>> {
        let records = query_as::<_, BookmarkRecord>(
            "SELECT uid, service_id, url, name, uploader, thumbnail_url, \
                    stream_count, last_updated \
             FROM remote_playlists \
             WHERE service_id = ? AND url = ? \
             ORDER BY uid ASC",
        )
        .bind(identity.service_id)
        .bind(&identity.url)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn insert(&self, snapshot: &PlaylistSnapshot) -> Result<BookmarkRecord> {
        let last_updated = chrono::Utc::now().timestamp();
        let result = query(
            r#"
            INSERT INTO remote_playlists (
                service_id, url, name, uploader, thumbnail_url,
                stream_count, last_updated
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(snapshot.identity.service_id)
        .bind(&snapshot.identity.url)
        .bind(&snapshot.name)
        .bind(&snapshot.uploader_name)
        .bind(snapshot.display_thumbnail())
        .bind(snapshot.stream_count)
        .bind(last_updated)
        .execute(&self.pool)
        .await?;

        let record = BookmarkRecord {
            uid: result.last_insert_rowid(),
            service_id: snapshot.identity.service_id,
            url: snapshot.identity.url.clone(),
            name: snapshot.name.clone(),
            uploader: snapshot.uploader_name.clone(),
            thumbnail_url: snapshot.display_thumbnail().map(str::to_string),
            stream_count: snapshot.stream_count,
            last_updated,
        };

        debug!(uid = record.uid, identity = %snapshot.identity, "bookmarked playlist");
        self.notify_changed();
        Ok(record)
    }

    async fn update(&self, uid: i64, snapshot: &PlaylistSnapshot) -> Result<()> {
        let result = query(
            r#"
            UPDATE remote_playlists
            SET name = ?, uploader = ?, thumbnail_url = ?, stream_count = ?,
                last_updated = ?
            WHERE uid = ?
            "#,
        )
        .bind(&snapshot.name)
        .bind(&snapshot.uploader_name)
        .bind(snapshot.display_thumbnail())
        .bind(snapshot.stream_count)
        .bind(chrono::Utc::now().timestamp())
        .bind(uid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BookmarkError::NotFound { uid });
        }

        debug!(uid, identity = %snapshot.identity, "refreshed playlist bookmark");
        self.notify_changed();
        Ok(())
    }

    async fn delete(&self, uid: i64) -> Result<()> {
        let result = query("DELETE FROM remote_playlists WHERE uid = ?")
            .bind(uid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            debug!(uid, "removed playlist bookmark");
            self.notify_changed();
        }
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
