//! Play queue construction.
//!
//! A [`PlayQueue`] is an ordered playback plan derived from the currently
//! loaded [`ItemList`] under one of three traversal policies. Builders are
//! pure: an empty list yields an empty queue with focus index 0, and
//! non-playable entries are never carried into a queue. All index math is
//! performed over the playable-only view of the list.

use crate::items::{ItemList, PlaylistIdentity, StreamItem};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An ordered playback plan handed off by value to the player collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayQueue {
    identity: PlaylistIdentity,
    /// Continuation token for fetching pages beyond the loaded items.
    next_page: Option<String>,
    items: Vec<StreamItem>,
    /// Starting focus index; 0 <= index < len, or 0 when the queue is empty.
    index: usize,
}

impl PlayQueue {
    /// Copies the playable items in existing order, starting at `index`.
    pub fn sequential(
        identity: PlaylistIdentity,
        next_page: Option<String>,
        list: &ItemList,
        index: usize,
    ) -> Self {
        let items: Vec<StreamItem> = list.streams().cloned().collect();
        let index = clamp_index(items.len(), index);
        debug!(len = items.len(), index, "built sequential play queue");
        Self {
            identity,
            next_page,
            items,
            index,
        }
    }

    /// Same order as [`sequential`](Self::sequential), starting at `item`.
    ///
    /// Falls back to index 0 when the item is not part of the list.
    pub fn sequential_from(
        identity: PlaylistIdentity,
        next_page: Option<String>,
        list: &ItemList,
        item: &StreamItem,
    ) -> Self {
        let index = list.stream_position(item).unwrap_or(0);
        Self::sequential(identity, next_page, list, index)
    }

    /// Uniformly random permutation of the playable items.
    ///
    /// The policy is to randomize and then play from the top, so the focus
    /// index is always 0.
    pub fn shuffled(
        identity: PlaylistIdentity,
        next_page: Option<String>,
        list: &ItemList,
    ) -> Self {
        let mut items: Vec<StreamItem> = list.streams().cloned().collect();
        items.shuffle(&mut rand::rng());
        debug!(len = items.len(), "built shuffled play queue");
        Self {
            identity,
            next_page,
            items,
            index: 0,
        }
    }

    /// Playable items in reverse positional order.
    ///
    /// The focus index is recomputed as `n - 1 - index` so it keeps pointing
    /// at the same logical item after the reversal.
    pub fn reversed(
        identity: PlaylistIdentity,
        next_page: Option<String>,
        list: &ItemList,
        index: usize,
    ) -> Self {
        let mut items: Vec<StreamItem> = list.streams().cloned().collect();
        items.reverse();
        let index = match items.len() {
            0 => 0,
            n => n - 1 - clamp_index(n, index),
        };
        debug!(len = items.len(), index, "built reversed play queue");
        Self {
            identity,
            next_page,
            items,
            index,
        }
    }

    pub fn identity(&self) -> &PlaylistIdentity {
        &self.identity
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn items(&self) -> &[StreamItem] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item playback starts at, if the queue is non-empty.
    pub fn current(&self) -> Option<&StreamItem> {
        self.items.get(self.index)
    }
}

fn clamp_index(len: usize, index: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ListEntry;
    use std::collections::BTreeSet;

    fn item(n: u32) -> StreamItem {
        StreamItem::new(format!("https://example.com/watch/{n}"), format!("Track {n}"))
    }

    fn identity() -> PlaylistIdentity {
        PlaylistIdentity::new(0, "https://example.com/playlist/abc")
    }

    fn list_of(n: u32) -> ItemList {
        (1..=n).map(item).collect()
    }

    #[test]
    fn sequential_preserves_order_and_index() {
        let list = list_of(5);
        for i in 0..5 {
            let queue = PlayQueue::sequential(identity(), None, &list, i);
            assert_eq!(queue.index(), i);
            assert_eq!(queue.len(), 5);
            let urls: Vec<_> = queue.items().iter().map(|s| s.url.clone()).collect();
            let expected: Vec<_> = list.streams().map(|s| s.url.clone()).collect();
            assert_eq!(urls, expected);
        }
    }

    #[test]
    fn sequential_clamps_out_of_range_index() {
        let queue = PlayQueue::sequential(identity(), None, &list_of(3), 99);
        assert_eq!(queue.index(), 2);
    }

    #[test]
    fn sequential_from_focuses_the_given_item() {
        let list = list_of(4);
        let queue = PlayQueue::sequential_from(identity(), None, &list, &item(3));
        assert_eq!(queue.index(), 2);
        assert_eq!(queue.current(), Some(&item(3)));
    }

    #[test]
    fn sequential_from_unknown_item_falls_back_to_zero() {
        let queue = PlayQueue::sequential_from(identity(), None, &list_of(4), &item(42));
        assert_eq!(queue.index(), 0);
    }

    #[test]
    fn empty_list_yields_empty_queue_with_index_zero() {
        let list = ItemList::new();
        let sequential = PlayQueue::sequential(identity(), None, &list, 7);
        assert!(sequential.is_empty());
        assert_eq!(sequential.index(), 0);
        assert_eq!(sequential.current(), None);

        let shuffled = PlayQueue::shuffled(identity(), None, &list);
        assert!(shuffled.is_empty());
        assert_eq!(shuffled.index(), 0);
    }

    #[test]
    fn shuffled_is_a_permutation_starting_at_zero() {
        let list = list_of(20);
        let queue = PlayQueue::shuffled(identity(), None, &list);

        assert_eq!(queue.index(), 0);
        assert_eq!(queue.len(), 20);
        let original: BTreeSet<_> = list.streams().map(|s| s.url.clone()).collect();
        let shuffled: BTreeSet<_> = queue.items().iter().map(|s| s.url.clone()).collect();
        assert_eq!(original, shuffled);
    }

    #[test]
    fn reversed_inverts_order_and_recomputes_index() {
        // [a, b, c] focused on a (index 0) becomes [c, b, a] focused on
        // index 2, still pointing at a.
        let list = list_of(3);
        let queue = PlayQueue::reversed(identity(), None, &list, 0);

        let urls: Vec<_> = queue.items().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/watch/3",
                "https://example.com/watch/2",
                "https://example.com/watch/1",
            ]
        );
        assert_eq!(queue.index(), 2);
        assert_eq!(queue.current(), Some(&item(1)));
    }

    #[test]
    fn reversed_keeps_focus_on_the_same_item_for_all_indices() {
        let list = list_of(6);
        for i in 0..6 {
            let focused = item(i as u32 + 1);
            let queue = PlayQueue::reversed(identity(), None, &list, i);
            assert_eq!(queue.current(), Some(&focused));
        }
    }

    #[test]
    fn builders_ignore_non_playable_entries() {
        let mut list = ItemList::new();
        list.push(ListEntry::Header("Part one".to_string()));
        list.push(item(1));
        list.push(item(2));
        list.push(ListEntry::Header("Part two".to_string()));
        list.push(item(3));

        let sequential = PlayQueue::sequential(identity(), None, &list, 2);
        assert_eq!(sequential.len(), 3);
        assert_eq!(sequential.current(), Some(&item(3)));

        let reversed = PlayQueue::reversed(identity(), None, &list, 2);
        assert_eq!(reversed.len(), 3);
        assert_eq!(reversed.index(), 0);
        assert_eq!(reversed.current(), Some(&item(3)));

        let shuffled = PlayQueue::shuffled(identity(), None, &list);
        assert_eq!(shuffled.len(), 3);
    }

    #[test]
    fn queue_carries_identity_and_continuation() {
        let queue = PlayQueue::sequential(
            identity(),
            Some("page-2-token".to_string()),
            &list_of(2),
            1,
        );
        assert_eq!(queue.identity(), &identity());
        assert_eq!(queue.next_page(), Some("page-2-token"));
    }
}
