//! Latest-only pull-based delivery channel.
//!
//! The downstream subscriber drives the flow: every [`FeedReceiver::recv`]
//! call is one demand credit, and the producer side never queues more than
//! the most recent unconsumed value. A slow subscriber therefore skips stale
//! intermediate states and converges straight to the latest one.
//!
//! Built on `tokio::sync::watch`, which already keeps exactly one (the
//! newest) value per channel.

use tokio::sync::watch;

/// Create a connected latest-only feed pair.
pub fn channel<T: Clone>() -> (FeedSender<T>, FeedReceiver<T>) {
    let (tx, rx) = watch::channel(None);
    (FeedSender { tx }, FeedReceiver { rx })
}

/// Producer half. Dropping it ends the stream.
pub struct FeedSender<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> FeedSender<T> {
    /// Publish a value, replacing any unconsumed previous one.
    pub fn publish(&self, value: T) {
        // A closed receiver just means nobody is listening anymore.
        let _ = self.tx.send(Some(value));
    }

    /// Whether the receiving half is still attached.
    pub fn is_subscribed(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Consumer half; owned by the single downstream subscriber.
pub struct FeedReceiver<T> {
    rx: watch::Receiver<Option<T>>,
}

impl<T: Clone> FeedReceiver<T> {
    /// Request and await exactly one delivery.
    ///
    /// Returns `None` once the producer side is gone and no unseen value
    /// remains.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            // The slot only ever holds None before the first publish.
            if let Some(value) = self.rx.borrow_and_update().clone() {
                return Some(value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_published_value_on_request() {
        let (tx, mut rx) = channel();
        tx.publish(1u32);
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test]
    async fn unconsumed_values_collapse_to_latest() {
        let (tx, mut rx) = channel();
        tx.publish(1u32);
        tx.publish(2);
        tx.publish(3);

        // Only the newest state survives; the backlog was never queued.
        assert_eq!(rx.recv().await, Some(3));
    }

    #[tokio::test]
    async fn recv_waits_for_the_next_publish() {
        let (tx, mut rx) = channel();
        tx.publish("first");
        assert_eq!(rx.recv().await, Some("first"));

        let waiter = tokio::spawn(async move { rx.recv().await });
        tokio::task::yield_now().await;
        tx.publish("second");
        assert_eq!(waiter.await.unwrap(), Some("second"));
    }

    #[tokio::test]
    async fn dropped_sender_ends_the_stream() {
        let (tx, mut rx) = channel::<u32>();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn sender_observes_cancellation() {
        let (tx, rx) = channel::<u32>();
        assert!(tx.is_subscribed());
        drop(rx);
        assert!(!tx.is_subscribed());
    }
}
