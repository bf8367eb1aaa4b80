//! # Schedule policy.
//!
//! [`SchedulePolicy`] bundles the knobs that shape one recurring schedule:
//!
//! | field              | default      | effect                                          |
//! |--------------------|--------------|-------------------------------------------------|
//! | `period`           | required     | cadence; `None` or zero forces suspension       |
//! | `suspend`          | `false`      | force suspension regardless of other settings   |
//! | `allow_concurrent` | `true`       | whether overlapping ticks may execute together  |
//! | `max_occurrences`  | `None`       | stop scheduling once this many ticks fired      |
//! | `deadline`         | `Period`     | max staleness before a queued run is discarded  |
//!
//! Misconfiguration is never an error: an unusable period simply suspends
//! the schedule.

use std::time::Duration;

use crate::policies::deadline::Deadline;

/// Policy for one recurring schedule.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tickvisor::{Deadline, SchedulePolicy};
///
/// let policy = SchedulePolicy::every(Duration::from_millis(500))
///     .with_allow_concurrent(false)
///     .with_max_occurrences(Some(10))
///     .with_deadline(Deadline::After(Duration::from_secs(1)));
///
/// assert!(!policy.is_suspended(0));
/// assert!(policy.is_suspended(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulePolicy {
    /// Cadence of the schedule (`None` or zero = suspended).
    pub period: Option<Duration>,
    /// Maximum staleness of a queued run.
    pub deadline: Deadline,
    /// Number of ticks after which scheduling stops (`None` = unbounded).
    pub max_occurrences: Option<u64>,
    /// Whether a tick may start draining while another tick is in flight.
    pub allow_concurrent: bool,
    /// Forces suspension regardless of other settings.
    pub suspend: bool,
}

impl SchedulePolicy {
    /// Creates a policy with the given period and defaults for everything else.
    pub fn new(period: Option<Duration>) -> Self {
        Self {
            period,
            deadline: Deadline::default(),
            max_occurrences: None,
            allow_concurrent: true,
            suspend: false,
        }
    }

    /// Creates a policy firing every `period`.
    pub fn every(period: Duration) -> Self {
        Self::new(Some(period))
    }

    /// Returns the period if it can drive a schedule (non-zero).
    #[inline]
    pub fn effective_period(&self) -> Option<Duration> {
        self.period.filter(|p| *p > Duration::ZERO)
    }

    /// Returns `true` once `scheduled` ticks reached `max_occurrences`.
    #[inline]
    pub fn is_exhausted(&self, scheduled: u64) -> bool {
        self.max_occurrences.is_some_and(|max| scheduled >= max)
    }

    /// Effective suspension given the number of ticks already scheduled.
    ///
    /// Suspended if any of:
    /// - `suspend` is set,
    /// - `scheduled >= max_occurrences`,
    /// - the period is missing or zero.
    pub fn is_suspended(&self, scheduled: u64) -> bool {
        self.suspend || self.is_exhausted(scheduled) || self.effective_period().is_none()
    }

    /// Returns a new policy with updated period.
    pub fn with_period(mut self, period: Option<Duration>) -> Self {
        self.period = period;
        self
    }

    /// Returns a new policy with updated deadline.
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Returns a new policy with updated occurrence limit.
    pub fn with_max_occurrences(mut self, max: Option<u64>) -> Self {
        self.max_occurrences = max;
        self
    }

    /// Returns a new policy with updated concurrency flag.
    pub fn with_allow_concurrent(mut self, allow: bool) -> Self {
        self.allow_concurrent = allow;
        self
    }

    /// Returns a new policy with updated suspend flag.
    pub fn with_suspend(mut self, suspend: bool) -> Self {
        self.suspend = suspend;
        self
    }
}
