//! Change broadcast and undo-history entry points.
//!
//! The original editor wired its stores to ambient signal buses; here every
//! notification flows through an explicit [`Dispatcher`] owned by the store
//! and handed out as plain channel receivers. Subscribers that drop their
//! receiver are pruned on the next dispatch.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Command pushed into a store by the external undo/redo history.
///
/// `Undo` and `Redo` carry the full re-serialized blob for the state being
/// restored; the store re-unserializes from a clean reset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryAction {
    /// Drop all state.
    Reset,
    /// Restore the blob recorded before the change being undone.
    Undo(String),
    /// Re-apply the blob recorded after the change being redone.
    Redo(String),
}

/// Notification broadcast by a store after its contents changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreChange {
    /// Store was reset to empty.
    Reset,
    /// Store was restored by an undo.
    Undo,
    /// Store was restored by a redo.
    Redo,
    /// Ordinary content change.
    Change,
}

/// Single-threaded broadcast channel.
///
/// Each `subscribe` call opens an unbounded channel; `dispatch` clones the
/// value to every live subscriber and drops senders whose receiver is gone.
#[derive(Debug)]
pub struct Dispatcher<T> {
    senders: Vec<Sender<T>>,
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self {
            senders: Vec::new(),
        }
    }
}

impl<T: Clone> Dispatcher<T> {
    /// Create a dispatcher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Open a subscription. The returned receiver sees every value
    /// dispatched after this call.
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    /// Broadcast a value to all live subscribers.
    pub fn dispatch(&mut self, value: &T) {
        self.senders.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Number of live subscriptions (stale ones linger until a dispatch).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_to_all() {
        let mut dispatcher = Dispatcher::new();
        let rx_a = dispatcher.subscribe();
        let rx_b = dispatcher.subscribe();

        dispatcher.dispatch(&StoreChange::Change);

        assert_eq!(rx_a.try_recv(), Ok(StoreChange::Change));
        assert_eq!(rx_b.try_recv(), Ok(StoreChange::Change));
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut dispatcher = Dispatcher::new();
        let rx_a = dispatcher.subscribe();
        {
            let _rx_b = dispatcher.subscribe();
        }
        assert_eq!(dispatcher.subscriber_count(), 2);

        dispatcher.dispatch(&StoreChange::Reset);

        assert_eq!(dispatcher.subscriber_count(), 1);
        assert_eq!(rx_a.try_recv(), Ok(StoreChange::Reset));
    }

    #[test]
    fn test_no_subscribers_is_fine() {
        let mut dispatcher: Dispatcher<StoreChange> = Dispatcher::new();
        dispatcher.dispatch(&StoreChange::Change);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
