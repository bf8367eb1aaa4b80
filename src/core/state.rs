//! # Counters and the observable state snapshot.
//!
//! [`Counters`] live inside the scheduler's single state record, so a
//! [`ScheduleState`] snapshot is always internally consistent: observers never
//! see a success counted without its tick.

use tokio::time::Instant;

/// Outcome counters for one scheduler lifetime (until [`reset`](crate::Scheduler::reset)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    pub scheduled: u64,
    pub success: u64,
    pub failure: u64,
    pub last_run_at: Option<Instant>,
}

/// Read-only snapshot of a scheduler.
///
/// ## Example
/// ```rust
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use std::time::Duration;
/// use tickvisor::{Scheduler, SchedulePolicy, TaskFn, TaskError};
///
/// let task = TaskFn::arc("noop", || async { Ok::<_, TaskError>(()) });
/// let sched = Scheduler::new(task, SchedulePolicy::new(None));
///
/// let state = sched.state();
/// assert!(state.is_suspended);
/// assert_eq!(state.scheduled_count, 0);
/// assert_eq!(state.last_run_at, None);
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleState {
    /// Effective suspension (flag, occurrence limit or unusable period).
    pub is_suspended: bool,
    /// Ticks fired (queued) so far.
    pub scheduled_count: u64,
    /// Callback invocations that completed successfully.
    pub success_count: u64,
    /// Stale runs plus failed callback invocations.
    pub failure_count: u64,
    /// When the callback was last invoked.
    pub last_run_at: Option<Instant>,
}

impl ScheduleState {
    pub(crate) fn new(counters: &Counters, is_suspended: bool) -> Self {
        Self {
            is_suspended,
            scheduled_count: counters.scheduled,
            success_count: counters.success,
            failure_count: counters.failure,
            last_run_at: counters.last_run_at,
        }
    }

    /// Ticks that have a final outcome (success or failure).
    #[inline]
    pub fn settled_count(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// Ticks still queued or executing.
    #[inline]
    pub fn pending_count(&self) -> u64 {
        self.scheduled_count.saturating_sub(self.settled_count())
    }
}
