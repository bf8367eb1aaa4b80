//! # Event bus for broadcasting scheduler events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] so that the wake
//! handler, every concurrent drain loop and the control surface can publish
//! without coordinating with each other.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                      Listener (one):
//!   wake handler    ──┐
//!   drain loop #1   ──┼──► Bus ──────► scheduler event listener ──► SubscriberSet
//!   drain loop #N   ──┤  (broadcast)
//!   control surface ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never fails.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events published with no receiver attached are lost.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for scheduler events.
///
/// Cloning is cheap (the sender is `Arc`-backed); every clone publishes into
/// the same ring buffer.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// Returns immediately; with no receivers the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::TickScheduled));

        let mut late = bus.subscribe();
        bus.publish(Event::new(EventKind::RunStarting));
        assert_eq!(late.recv().await.expect("event").kind, EventKind::RunStarting);
    }

    #[tokio::test]
    async fn test_receiver_sees_events_in_order() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::TickScheduled));
        bus.publish(Event::new(EventKind::RunStarting));

        let first = rx.recv().await.expect("first event");
        let second = rx.recv().await.expect("second event");
        assert_eq!(first.kind, EventKind::TickScheduled);
        assert_eq!(second.kind, EventKind::RunStarting);
        assert!(second.seq > first.seq);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::Suspended));
        assert_eq!(rx.recv().await.expect("event").kind, EventKind::Suspended);
    }
}
