//! Workspace umbrella crate.
//!
//! Host applications can depend on `remote-playlist-core` and reach the
//! individual workspace crates (`core-queue`, `core-bookmarks`, `core-sync`)
//! through the re-exports below without wiring each crate individually.

pub use core_bookmarks as bookmarks;
pub use core_queue as queue;
pub use core_sync as sync;
