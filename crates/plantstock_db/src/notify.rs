//! Change notification fan-out.
//!
//! Delivery is fire-and-forget: a send with no live subscribers is dropped
//! silently and never fails the write that triggered it.

use tokio::sync::broadcast;
use tracing::trace;

use crate::contract::Address;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub(crate) struct ChangeNotifier {
    tx: broadcast::Sender<Address>,
}

impl ChangeNotifier {
    pub(crate) fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub(crate) fn notify(&self, changed: Address) {
        let delivered = self.tx.send(changed).unwrap_or(0);
        trace!(?changed, delivered, "Change notification sent");
    }

    pub(crate) fn subscribe(&self, address: Address) -> ChangeStream {
        ChangeStream {
            address,
            rx: self.tx.subscribe(),
        }
    }
}

/// Stream of change notifications relevant to one address.
///
/// A collection subscription yields every change. An item subscription
/// yields changes to that item and to the whole collection.
pub struct ChangeStream {
    address: Address,
    rx: broadcast::Receiver<Address>,
}

impl ChangeStream {
    /// Wait for the next relevant change.
    ///
    /// Returns `None` once the store and all its clones are dropped. If the
    /// subscriber fell behind, the missed changes are coalesced into one
    /// notification for the observed address.
    pub async fn recv(&mut self) -> Option<Address> {
        loop {
            match self.rx.recv().await {
                Ok(changed) if self.address.observes(&changed) => return Some(changed),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => return Some(self.address),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for a pending relevant change.
    pub fn try_recv(&mut self) -> Option<Address> {
        loop {
            match self.rx.try_recv() {
                Ok(changed) if self.address.observes(&changed) => return Some(changed),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(_)) => return Some(self.address),
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscribers_is_silent() {
        let notifier = ChangeNotifier::new();
        notifier.notify(Address::Collection);
    }

    #[test]
    fn test_item_stream_filters_other_items() {
        let notifier = ChangeNotifier::new();
        let mut item = notifier.subscribe(Address::Item(1));
        let mut all = notifier.subscribe(Address::Collection);

        notifier.notify(Address::Item(2));
        notifier.notify(Address::Item(1));

        assert_eq!(item.try_recv(), Some(Address::Item(1)));
        assert_eq!(item.try_recv(), None);
        assert_eq!(all.try_recv(), Some(Address::Item(2)));
        assert_eq!(all.try_recv(), Some(Address::Item(1)));
    }

    #[test]
    fn test_lagged_subscriber_gets_coalesced_change() {
        let notifier = ChangeNotifier::new();
        let mut item = notifier.subscribe(Address::Item(5));
        for _ in 0..(CHANNEL_CAPACITY + 10) {
            notifier.notify(Address::Item(9));
        }
        assert_eq!(item.try_recv(), Some(Address::Item(5)));
    }

    #[tokio::test]
    async fn test_recv_ends_when_notifier_dropped() {
        let notifier = ChangeNotifier::new();
        let mut stream = notifier.subscribe(Address::Collection);
        drop(notifier);
        assert_eq!(stream.recv().await, None);
    }
}
