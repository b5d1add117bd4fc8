//! Reconciliation of fetched playlist snapshots against the bookmark store.
//!
//! One cycle per successful load: look the bookmark up, write it back only
//! when the snapshot differs, then keep republishing the current state into
//! a latest-only feed until the cycle is cancelled. Starting a new cycle
//! cancels the previous one first, so at most one cycle's output stream is
//! ever feeding the subscriber.

use crate::feed::{self, FeedReceiver, FeedSender};
use crate::report::{ErrorReporter, UserAction};
use crate::Result;
use core_bookmarks::{BookmarkRecord, BookmarkStore, PlaylistSnapshot};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// The bookmark state delivered downstream: absent, or the single relevant
/// record.
pub type BookmarkState = Option<BookmarkRecord>;

const LOOKUP_CONTEXT: &str = "Get playlist bookmarks";

/// Backpressure-controlled, at-most-one-in-flight update pipeline.
pub struct ReconciliationPipeline {
    store: Arc<dyn BookmarkStore>,
    reporter: ErrorReporter,
    active: Option<CancellationToken>,
}

impl ReconciliationPipeline {
    pub fn new(store: Arc<dyn BookmarkStore>, reporter: ErrorReporter) -> Self {
        Self {
            store,
            reporter,
            active: None,
        }
    }

    /// Start a reconciliation cycle for a freshly fetched snapshot.
    ///
    /// Cancels the previous cycle (if any) before installing the new one and
    /// returns the feed the subscriber pulls bookmark states from. The cycle
    /// stays alive after the initial delivery, refreshing the state on every
    /// store change, until cancelled.
    pub fn reconcile(&mut self, snapshot: PlaylistSnapshot) -> FeedReceiver<BookmarkState> {
        let token = CancellationToken::new();
        if let Some(previous) = self.active.replace(token.clone()) {
            debug!("cancelling previous reconciliation cycle");
            previous.cancel();
        }

        let (tx, rx) = feed::channel();
        tokio::spawn(run_cycle(
            Arc::clone(&self.store),
            self.reporter.clone(),
            snapshot,
            tx,
            token,
        ));
        rx
    }

    /// Cancel the active cycle, if any.
    pub fn shutdown(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }
}

impl Drop for ReconciliationPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[instrument(skip_all, fields(identity = %snapshot.identity))]
async fn run_cycle(
    store: Arc<dyn BookmarkStore>,
    reporter: ErrorReporter,
    snapshot: PlaylistSnapshot,
    tx: FeedSender<BookmarkState>,
    token: CancellationToken,
) {
    // Subscribe before the initial lookup so mutations racing the cycle
    // still pulse a refresh.
    let mut changes = store.changes();

    match reconcile_once(store.as_ref(), &snapshot).await {
        Ok(state) => {
            if token.is_cancelled() {
                return;
            }
            tx.publish(state);
        }
        Err(e) => reporter.report(UserAction::RequestedBookmark, LOOKUP_CONTEXT, e),
    }

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            changed = changes.recv() => match changed {
                // A lagged receiver only means pulses were coalesced; the
                // state read below is current either way.
                Ok(()) | Err(RecvError::Lagged(_)) => {
                    refresh(store.as_ref(), &reporter, &snapshot, &tx, &token).await;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

/// Re-read the current state after a store change and republish it.
async fn refresh(
    store: &dyn BookmarkStore,
    reporter: &ErrorReporter,
    snapshot: &PlaylistSnapshot,
    tx: &FeedSender<BookmarkState>,
    token: &CancellationToken,
) {
    match store.lookup(&snapshot.identity).await {
        Ok(records) => {
            if !token.is_cancelled() {
                tx.publish(records.into_iter().next());
            }
        }
        Err(e) => reporter.report(UserAction::RequestedBookmark, LOOKUP_CONTEXT, e),
    }
}

/// One compare-and-write pass.
///
/// Writes only when the first candidate differs from the snapshot in a
/// user-visible field, and re-fetches afterwards so the returned state never
/// reflects the pre-update record.
async fn reconcile_once(
    store: &dyn BookmarkStore,
    snapshot: &PlaylistSnapshot,
) -> Result<BookmarkState> {
    let records = store.lookup(&snapshot.identity).await?;

    let state = match records.into_iter().next() {
        None => None,
        Some(record) if record.is_identical_to(snapshot) => {
            debug!(uid = record.uid, "bookmark already up to date");
            Some(record)
        }
        Some(record) => {
            debug!(uid = record.uid, "bookmark stale, updating from snapshot");
            store.update(record.uid, snapshot).await?;
            store.lookup(&snapshot.identity).await?.into_iter().next()
        }
    };

    Ok(state)
}
