//! # LogWriter: structured event logger
//!
//! A subscriber that renders every [`Event`] through `tracing`.
//! Lifecycle events go to `info`/`debug`, failures and expiries to `warn`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO tickvisor: tick scheduled task="report" count=3
//! DEBUG tickvisor: run starting task="report" age_ms=0
//! WARN tickvisor: run expired task="report" age_ms=750 deadline_ms=500
//! WARN tickvisor: run failed task="report" reason="execution failed: timeout"
//! INFO tickvisor: schedule suspended task="report" count=10
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::TickScheduled => {
                info!(target: "tickvisor", task, count = ?e.count, "tick scheduled");
            }
            EventKind::TickDeferred => {
                debug!(target: "tickvisor", task, "tick deferred to in-flight drain");
            }
            EventKind::TickSkipped => {
                debug!(target: "tickvisor", task, reason, "tick skipped");
            }
            EventKind::RunStarting => {
                debug!(target: "tickvisor", task, age_ms = ?e.age_ms, "run starting");
            }
            EventKind::RunSucceeded => {
                info!(target: "tickvisor", task, "run succeeded");
            }
            EventKind::RunFailed => {
                warn!(target: "tickvisor", task, reason, "run failed");
            }
            EventKind::RunExpired => {
                warn!(
                    target: "tickvisor",
                    task,
                    age_ms = ?e.age_ms,
                    deadline_ms = ?e.deadline_ms,
                    "run expired"
                );
            }
            EventKind::Suspended => {
                info!(target: "tickvisor", task, count = ?e.count, "schedule suspended");
            }
            EventKind::Resumed => {
                info!(target: "tickvisor", task, delay_ms = ?e.delay_ms, "schedule resumed");
            }
            EventKind::PolicyUpdated => {
                info!(target: "tickvisor", task, "policy updated");
            }
            EventKind::TaskReplaced => {
                info!(target: "tickvisor", task, "task replaced");
            }
            EventKind::CountersReset => {
                info!(target: "tickvisor", task, "counters reset");
            }
            EventKind::ShutdownRequested => {
                info!(target: "tickvisor", "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!(target: "tickvisor", "all runs stopped within grace");
            }
            EventKind::GraceExceeded => {
                warn!(target: "tickvisor", in_flight = ?e.count, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "tickvisor", subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "tickvisor", subscriber = task, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
