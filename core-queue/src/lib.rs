//! # Play Queue Module
//!
//! Owns the loaded-item-list view of a remote playlist and the pure
//! transformations that turn it into an ordered playback plan.
//!
//! ## Overview
//!
//! This module manages:
//! - The `ItemList` loaded (and paginated) by the fetch collaborator
//! - `PlayQueue` construction under three traversal policies:
//!   sequential, shuffled, and reversed
//!
//! Queue construction is side-effect free: builders are total functions over
//! their inputs and never touch the network or the database.

pub mod items;
pub mod queue;

pub use items::{ItemList, ListEntry, PlaylistIdentity, StreamItem};
pub use queue::PlayQueue;
