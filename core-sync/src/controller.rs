//! Subscriber-side bookmark state, owned by the main execution context.
//!
//! The controller is the single consumer of the reconciliation feed. It
//! holds the UI-owned state (readiness gate, current record) and is meant to
//! be driven from one task only; pipeline cycles communicate with it
//! exclusively through the feed.

use crate::feed::FeedReceiver;
use crate::pipeline::{BookmarkState, ReconciliationPipeline};
use crate::report::{ErrorReporter, UserAction};
use core_bookmarks::{BookmarkRecord, BookmarkStore, PlaylistSnapshot};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Explicit state object behind the bookmark UI affordances.
pub struct BookmarkController {
    store: Arc<dyn BookmarkStore>,
    pipeline: ReconciliationPipeline,
    reporter: ErrorReporter,
    snapshot: Option<PlaylistSnapshot>,
    current: Option<BookmarkRecord>,
    /// Set by the first successful delivery; until then every toggle is a
    /// no-op so a click cannot race ahead of the initial state load.
    ready: bool,
    subscription: Option<FeedReceiver<BookmarkState>>,
    actions: Vec<JoinHandle<()>>,
}

impl BookmarkController {
    pub fn new(store: Arc<dyn BookmarkStore>, reporter: ErrorReporter) -> Self {
        Self {
            pipeline: ReconciliationPipeline::new(Arc::clone(&store), reporter.clone()),
            store,
            reporter,
            snapshot: None,
            current: None,
            ready: false,
            subscription: None,
            actions: Vec::new(),
        }
    }

    /// Handle a successfully loaded playlist snapshot.
    ///
    /// Reports the snapshot's non-fatal fetch errors, then starts a
    /// reconciliation cycle, replacing (and thereby cancelling) any previous
    /// subscription.
    pub fn handle_loaded(&mut self, snapshot: PlaylistSnapshot) {
        if !snapshot.fetch_errors.is_empty() {
            self.reporter.report(
                UserAction::RequestedPlaylist,
                snapshot.identity.url.clone(),
                snapshot.fetch_errors.join("; "),
            );
        }

        self.subscription = Some(self.pipeline.reconcile(snapshot.clone()));
        self.snapshot = Some(snapshot);
    }

    /// Pull exactly one delivery from the active subscription and apply it.
    ///
    /// The steady-state pull rate of the subscriber contract: consume one,
    /// request one more. Returns `None` when no subscription is active or
    /// the stream ended.
    pub async fn next_state(&mut self) -> Option<BookmarkState> {
        let subscription = self.subscription.as_mut()?;
        let state = subscription.recv().await?;
        self.current = state.clone();
        self.ready = true;
        Some(state)
    }

    /// Toggle the bookmark for the currently loaded playlist.
    ///
    /// A no-op before the first delivery arrives. Adding is fire-and-forget
    /// (the new record comes back through the store-change redelivery);
    /// removing clears the local record as soon as the delete succeeds.
    pub async fn toggle_bookmark(&mut self) {
        if !self.ready {
            debug!("bookmark toggle ignored, initial state not delivered yet");
            return;
        }

        match self.current.as_ref().map(|record| record.uid) {
            Some(uid) => match self.store.delete(uid).await {
                Ok(()) => self.current = None,
                Err(e) => self.reporter.report(
                    UserAction::RequestedBookmark,
                    "Deleting playlist bookmark",
                    e,
                ),
            },
            None => {
                if let Some(snapshot) = self.snapshot.clone() {
                    let store = Arc::clone(&self.store);
                    let reporter = self.reporter.clone();
                    self.actions.push(tokio::spawn(async move {
                        if let Err(e) = store.insert(&snapshot).await {
                            reporter.report(
                                UserAction::RequestedBookmark,
                                "Adding playlist bookmark",
                                e,
                            );
                        }
                    }));
                }
            }
        }

        self.actions.retain(|handle| !handle.is_finished());
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_bookmarked(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_record(&self) -> Option<&BookmarkRecord> {
        self.current.as_ref()
    }

    /// Tear down on view destruction.
    ///
    /// Cancels the active cycle, aborts in-flight toggle actions, and clears
    /// the state so any late-arriving or queued action becomes a no-op.
    pub fn teardown(&mut self) {
        self.ready = false;
        self.pipeline.shutdown();
        self.subscription = None;
        for handle in self.actions.drain(..) {
            handle.abort();
        }
        self.current = None;
    }
}

impl Drop for BookmarkController {
    fn drop(&mut self) {
        self.teardown();
    }
}
