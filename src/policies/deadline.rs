//! # Deadline policy for queued runs.
//!
//! [`Deadline`] decides how old a queued run may get before the execution loop
//! discards it instead of invoking the callback.
//!
//! - [`Deadline::Period`] the run may wait up to one period (default).
//! - [`Deadline::After`] the run may wait up to a fixed duration.
//! - [`Deadline::Never`] queued runs never expire.
//!
//! ## Staleness rule
//! ```text
//! age = now - run.when
//! age >  deadline  → RunExpired (failure, callback not invoked)
//! age <= deadline  → callback invoked
//! ```

use std::time::Duration;

/// Maximum staleness of a queued run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deadline {
    /// Tracks the schedule's current period (default).
    ///
    /// Resolved at drain time, so a period change also moves the deadline.
    /// Without a usable period the deadline resolves to zero.
    Period,
    /// A fixed maximum age.
    After(Duration),
    /// Queued runs never expire.
    Never,
}

impl Default for Deadline {
    /// Returns [`Deadline::Period`].
    fn default() -> Self {
        Deadline::Period
    }
}

impl Deadline {
    /// Resolves the deadline against the current period.
    ///
    /// Returns `None` when runs never expire.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use tickvisor::Deadline;
    ///
    /// let p = Some(Duration::from_millis(500));
    /// assert_eq!(Deadline::Period.resolve(p), Some(Duration::from_millis(500)));
    /// assert_eq!(Deadline::After(Duration::from_secs(1)).resolve(p), Some(Duration::from_secs(1)));
    /// assert_eq!(Deadline::Never.resolve(p), None);
    /// ```
    pub fn resolve(&self, period: Option<Duration>) -> Option<Duration> {
        match self {
            Deadline::Period => Some(period.unwrap_or(Duration::ZERO)),
            Deadline::After(d) => Some(*d),
            Deadline::Never => None,
        }
    }

    /// Returns `true` if a run of the given age must be discarded.
    pub fn is_exceeded(&self, age: Duration, period: Option<Duration>) -> bool {
        self.resolve(period).is_some_and(|limit| age > limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Option<Duration> = Some(Duration::from_millis(500));

    #[test]
    fn test_age_equal_to_deadline_is_not_stale() {
        assert!(!Deadline::Period.is_exceeded(Duration::from_millis(500), P));
        assert!(Deadline::Period.is_exceeded(Duration::from_millis(501), P));
    }

    #[test]
    fn test_period_deadline_without_period_is_zero() {
        assert!(!Deadline::Period.is_exceeded(Duration::ZERO, None));
        assert!(Deadline::Period.is_exceeded(Duration::from_millis(1), None));
    }

    #[test]
    fn test_never_deadline_never_expires() {
        assert!(!Deadline::Never.is_exceeded(Duration::from_secs(3600), P));
    }

    #[test]
    fn test_fixed_deadline_ignores_period() {
        let d = Deadline::After(Duration::from_millis(750));
        assert!(!d.is_exceeded(Duration::from_millis(700), P));
        assert!(d.is_exceeded(Duration::from_millis(800), None));
    }
}
