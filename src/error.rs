//! Error types used by the tickvisor scheduler and its callbacks.
//!
//! This module defines three enums:
//!
//! - [`TaskError`]: the outcome of a single callback invocation.
//! - [`RunFailure`]: why a queued run was counted as a failure.
//! - [`RuntimeError`]: errors raised by the scheduler lifecycle itself.
//!
//! The scheduling path never returns errors to its caller: callback errors and
//! stale runs only show up in the failure counter and as events. All types
//! provide helper methods (`as_label`, `as_message`) for logging/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the scheduler lifecycle.
///
/// Only [`Scheduler::shutdown`](crate::Scheduler::shutdown) returns these.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some runs were still in flight.
    #[error("shutdown timeout {grace:?} exceeded; {in_flight} tick(s) still in flight")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of ticks whose drain loop had not finished.
        in_flight: usize,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), in_flight: 1 };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::GraceExceeded { grace, in_flight } => {
                format!("grace exceeded after {grace:?}; in_flight={in_flight}")
            }
        }
    }
}

/// # Errors produced by a callback invocation.
///
/// Every variant is counted once in the failure counter; none of them stops
/// the schedule.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The callback reported a failure.
    #[error("execution failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// The callback panicked while being polled.
    #[error("callback panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use tickvisor::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.as_label(), "task_failed");
    /// ```
    pub fn fail(reason: impl Into<String>) -> Self {
        TaskError::Fail {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { reason } => format!("error: {reason}"),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

/// # Why a queued run counted as a failure.
///
/// - [`RunFailure::Stale`]: the run waited longer than its deadline and was
///   discarded without invoking the callback.
/// - [`RunFailure::Callback`]: the callback ran and failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunFailure {
    /// The run's age exceeded the deadline at drain time.
    #[error("stale run: waited {age:?}, deadline {deadline:?}")]
    Stale {
        /// Time between the nominal tick and the drain attempt.
        age: Duration,
        /// Effective deadline at drain time.
        deadline: Duration,
    },

    /// The callback itself failed.
    #[error(transparent)]
    Callback(#[from] TaskError),
}

impl RunFailure {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use tickvisor::{RunFailure, TaskError};
    ///
    /// let stale = RunFailure::Stale { age: Duration::from_millis(750), deadline: Duration::from_millis(500) };
    /// assert_eq!(stale.as_label(), "run_stale");
    ///
    /// let failed = RunFailure::from(TaskError::fail("boom"));
    /// assert_eq!(failed.as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunFailure::Stale { .. } => "run_stale",
            RunFailure::Callback(e) => e.as_label(),
        }
    }

    /// Returns `true` when the callback was never invoked.
    pub fn is_stale(&self) -> bool {
        matches!(self, RunFailure::Stale { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_labels() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(
            TaskError::Panicked { info: "p".into() }.as_label(),
            "task_panicked"
        );
    }

    #[test]
    fn test_run_failure_wraps_task_error_transparently() {
        let err = RunFailure::from(TaskError::fail("boom"));
        assert_eq!(err.to_string(), "execution failed: boom");
        assert!(!err.is_stale());
    }

    #[test]
    fn test_stale_run_message() {
        let err = RunFailure::Stale {
            age: Duration::from_millis(750),
            deadline: Duration::from_millis(500),
        };
        assert!(err.is_stale());
        assert_eq!(err.to_string(), "stale run: waited 750ms, deadline 500ms");
    }

    #[test]
    fn test_grace_exceeded_message() {
        let err = RuntimeError::GraceExceeded {
            grace: Duration::from_secs(2),
            in_flight: 3,
        };
        assert_eq!(err.as_message(), "grace exceeded after 2s; in_flight=3");
    }
}
