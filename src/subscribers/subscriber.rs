//! # Scheduler event subscribers.
//!
//! A [`Subscribe`] implementation sees every tick, run and control event of
//! one scheduler, in publication order. Typical uses are expiry alerts,
//! run-latency metrics built from `age_ms`, or an audit of policy changes.
//!
//! The wake handler and drain loops only publish; they never wait for a
//! subscriber. A subscriber that falls behind loses events from its own
//! queue (reported as `SubscriberOverflow`) while ticks keep landing on the
//! grid, and a panicking subscriber is reported as `SubscriberPanicked`
//! without affecting the schedule.
//!
//! Subscribers are released when the scheduler shuts down or is dropped.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use tickvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct Expired(AtomicU64);
//!
//! #[async_trait]
//! impl Subscribe for Expired {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::RunExpired) {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "expired" }
//!     fn queue_capacity(&self) -> usize { 2048 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Observer of one scheduler's events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one event on the subscriber's own worker task.
    async fn on_event(&self, event: &Event);

    /// Name reported in `SubscriberOverflow`/`SubscriberPanicked` events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Number of events that may wait for this subscriber before new ones
    /// are dropped (at least 1).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
