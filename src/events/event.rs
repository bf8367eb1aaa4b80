//! # Runtime events emitted by the scheduler.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Tick events**: the wake handler's decisions (scheduled, deferred, skipped)
//! - **Run events**: execution loop outcomes (starting, succeeded, failed, expired)
//! - **Control events**: reconfiguration, suspension and reset
//! - **Lifecycle events**: shutdown and subscriber health
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! nominal tick instant, run age and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::RunExpired)
//!     .with_task("report")
//!     .with_age(Duration::from_millis(750))
//!     .with_deadline(Duration::from_millis(500));
//!
//! assert_eq!(ev.kind, EventKind::RunExpired);
//! assert_eq!(ev.task.as_deref(), Some("report"));
//! assert_eq!(ev.age_ms, Some(750));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use tokio::time::Instant;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Tick events ===
    /// A wake fired and queued a run for its nominal tick.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    /// - `count`: scheduled count after this tick
    TickScheduled,

    /// The run was queued but this wake declined to drain it
    /// (concurrency disallowed and another tick in flight).
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    TickDeferred,

    /// A wake was ignored: its tick is already claimed or no longer current.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    /// - `reason`: "claimed" or "superseded"
    TickSkipped,

    // === Run events ===
    /// The execution loop is invoking the callback for a queued run.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    /// - `age_ms`: time the run spent queued
    RunStarting,

    /// The callback completed successfully.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    RunSucceeded,

    /// The callback returned an error or panicked.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    /// - `reason`: failure message
    RunFailed,

    /// A queued run exceeded its deadline and was discarded.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `when`: nominal tick instant
    /// - `age_ms`: time the run spent queued
    /// - `deadline_ms`: effective deadline
    RunExpired,

    // === Control events ===
    /// Schedule entered suspension; the cursor was cleared.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `count`: scheduled count at suspension
    Suspended,

    /// Schedule was activated (initially, after suspension or after reset) and anchored a new cadence grid.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `delay_ms`: delay until the first tick
    Resumed,

    /// Policy was replaced through the control surface.
    ///
    /// Sets:
    /// - `task`: task name
    PolicyUpdated,

    /// Callback reference was swapped; the cadence is untouched.
    ///
    /// Sets:
    /// - `task`: new task name
    TaskReplaced,

    /// Counters and cursor were reset.
    ///
    /// Sets:
    /// - `task`: task name
    CountersReset,

    // === Shutdown events ===
    /// Shutdown requested; no new wakes are armed.
    ShutdownRequested,

    /// All in-flight runs finished within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; some runs were still in flight.
    ///
    /// Sets:
    /// - `count`: number of ticks still in flight
    GraceExceeded,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Nominal tick instant the event refers to.
    pub when: Option<Instant>,
    /// Time a run spent queued, in milliseconds (compact).
    pub age_ms: Option<u32>,
    /// Effective deadline in milliseconds (compact).
    pub deadline_ms: Option<u32>,
    /// Delay until the next wake in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Counter value relevant to the event.
    pub count: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

#[inline]
fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            when: None,
            age_ms: None,
            deadline_ms: None,
            delay_ms: None,
            count: None,
            reason: None,
            task: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches the nominal tick instant.
    #[inline]
    pub fn with_when(mut self, when: Instant) -> Self {
        self.when = Some(when);
        self
    }

    /// Attaches a queue age (stored as milliseconds).
    #[inline]
    pub fn with_age(mut self, d: Duration) -> Self {
        self.age_ms = Some(compact_ms(d));
        self
    }

    /// Attaches an effective deadline (stored as milliseconds).
    #[inline]
    pub fn with_deadline(mut self, d: Duration) -> Self {
        self.deadline_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a wake delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a counter value.
    #[inline]
    pub fn with_count(mut self, n: u64) -> Self {
        self.count = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}
