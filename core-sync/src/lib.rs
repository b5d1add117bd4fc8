//! # Bookmark Sync Module
//!
//! Reconciles freshly fetched playlist snapshots against the persisted
//! bookmark store and republishes the current bookmark state to a single
//! pull-based subscriber.
//!
//! ## Components
//!
//! - **Latest-only Feed** (`feed`): single-consumer channel that collapses
//!   unconsumed deliveries to the most recent value and only hands one over
//!   per explicit request
//! - **Reconciliation Pipeline** (`pipeline`): conditional compare-and-write
//!   cycle with at most one cycle in flight at a time
//! - **Bookmark Controller** (`controller`): subscriber-side state object
//!   holding the readiness gate, the current record, and the toggle action
//! - **Error Reporting** (`report`): non-fatal error reports routed to the
//!   UI-facing collaborator

pub mod controller;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod report;

pub use controller::BookmarkController;
pub use error::{Result, SyncError};
pub use feed::{FeedReceiver, FeedSender};
pub use pipeline::{BookmarkState, ReconciliationPipeline};
pub use report::{ErrorReport, ErrorReporter, UserAction};
