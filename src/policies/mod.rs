//! Schedule policies.
//!
//! This module groups the knobs that control **when** a schedule fires and
//! **how long** a queued run may wait before it is discarded.
//!
//! ## Contents
//! - [`SchedulePolicy`] period, suspension, concurrency and occurrence limit
//! - [`Deadline`] staleness limit for queued runs
//!
//! ## Quick wiring
//! ```text
//! SchedulePolicy { period, deadline, max_occurrences, allow_concurrent, suspend }
//!      └─► core::cursor::reconcile uses period/suspension to arm the next wake
//!      └─► core::runner::drain uses deadline to expire stale runs
//! ```
//!
//! ## Defaults
//! - `deadline = Deadline::Period` (a run may wait until the next tick is due).
//! - `allow_concurrent = true`, `max_occurrences = None`, `suspend = false`.

mod deadline;
mod schedule;

pub use deadline::Deadline;
pub use schedule::SchedulePolicy;
