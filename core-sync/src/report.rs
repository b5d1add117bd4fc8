//! Non-fatal error reporting towards the UI collaborator.
//!
//! Store failures never crash the pipeline; they surface here as
//! `(action, context, cause)` tuples the UI turns into a notification.

use std::fmt;
use tokio::sync::broadcast;
use tracing::warn;

/// The user-initiated action a report is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    RequestedPlaylist,
    RequestedBookmark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub action: UserAction,
    /// Short label describing what was being attempted.
    pub context: String,
    pub cause: String,
}

/// Fans error reports out to whoever is listening.
///
/// Reports are fire-and-forget: with no subscriber attached they are
/// dropped after being logged.
#[derive(Debug, Clone)]
pub struct ErrorReporter {
    tx: broadcast::Sender<ErrorReport>,
}

impl ErrorReporter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ErrorReport> {
        self.tx.subscribe()
    }

    pub fn report(
        &self,
        action: UserAction,
        context: impl Into<String>,
        cause: impl fmt::Display,
    ) {
        let report = ErrorReport {
            action,
            context: context.into(),
            cause: cause.to_string(),
        };
        warn!(
            action = ?report.action,
            context = %report.context,
            cause = %report.cause,
            "reporting non-fatal error"
        );
        let _ = self.tx.send(report);
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(16)
    }
}
