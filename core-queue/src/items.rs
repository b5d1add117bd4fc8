//! Domain models for the loaded playlist item list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a remote playlist: the hosting service plus the playlist url.
///
/// Used as the lookup key for bookmarks and carried by every play queue so
/// the player can resolve continuation pages against the right service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistIdentity {
    pub service_id: i32,
    pub url: String,
}

impl PlaylistIdentity {
    pub fn new(service_id: i32, url: impl Into<String>) -> Self {
        Self {
            service_id,
            url: url.into(),
        }
    }
}

impl fmt::Display for PlaylistIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.url, self.service_id)
    }
}

/// A single playable entry of a playlist.
///
/// Immutable once produced by the fetch layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamItem {
    pub url: String,
    pub title: String,
    /// Duration in seconds; absent when the service does not report one.
    pub duration_secs: Option<u64>,
    pub uploader_name: Option<String>,
    pub uploader_url: Option<String>,
}

impl StreamItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            duration_secs: None,
            uploader_name: None,
            uploader_url: None,
        }
    }
}

/// One entry of a loaded list.
///
/// Services interleave non-playable entries (section dividers and the like)
/// with streams; only `Stream` entries ever end up in a play queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListEntry {
    Stream(StreamItem),
    Header(String),
}

impl ListEntry {
    /// The playable item behind this entry, if it is one.
    pub fn as_stream(&self) -> Option<&StreamItem> {
        match self {
            ListEntry::Stream(item) => Some(item),
            ListEntry::Header(_) => None,
        }
    }
}

impl From<StreamItem> for ListEntry {
    fn from(item: StreamItem) -> Self {
        ListEntry::Stream(item)
    }
}

/// Ordered view of the items loaded so far, insertion order = load order.
///
/// Mutated only by the load/pagination collaborator (`push`/`append_page`);
/// read-only to queue construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemList {
    entries: Vec<ListEntry>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<ListEntry>) {
        self.entries.push(entry.into());
    }

    /// Appends one loaded page worth of entries.
    pub fn append_page(&mut self, entries: impl IntoIterator<Item = ListEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Playable-only view, in list order.
    pub fn streams(&self) -> impl DoubleEndedIterator<Item = &StreamItem> {
        self.entries.iter().filter_map(ListEntry::as_stream)
    }

    /// Position of `item` within the playable-only view.
    pub fn stream_position(&self, item: &StreamItem) -> Option<usize> {
        self.streams().position(|candidate| candidate == item)
    }
}

impl FromIterator<StreamItem> for ItemList {
    fn from_iter<I: IntoIterator<Item = StreamItem>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(ListEntry::Stream).collect(),
        }
    }
}
