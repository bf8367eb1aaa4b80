//! # Scheduler runtime configuration.
//!
//! Provides [`SchedulerConfig`] centralized settings for the scheduler runtime.
//! These are the knobs that do not belong to a single schedule's policy:
//! event bus sizing and the shutdown grace window.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus
//! - `grace = 0s` → shutdown does not wait for in-flight runs

use std::time::Duration;

/// Runtime configuration for a [`Scheduler`](crate::Scheduler).
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `grace`: Maximum wait for in-flight runs during [`shutdown`](crate::Scheduler::shutdown)
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Maximum time to wait for in-flight drain loops on shutdown.
    ///
    /// - `Duration::ZERO` = do not wait
    /// - `> 0` = wait up to this long, then return `RuntimeError::GraceExceeded`
    pub grace: Duration,
}

impl SchedulerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `grace = 60s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            grace: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_capacity_is_clamped() {
        let cfg = SchedulerConfig {
            bus_capacity: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
