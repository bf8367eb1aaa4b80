//! # tickvisor
//!
//! **Tickvisor** fires one async callback on a recurring, drift-free cadence.
//!
//! Ticks land on an absolute grid (`anchor + k × period`) derived from the
//! previous *nominal* tick, never from when the callback ran, so slow wakes and
//! slow callbacks do not accumulate drift. Late runs are discarded once they
//! are older than their deadline, overlapping ticks can be serialized, and the
//! whole schedule can be reconfigured while it runs.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────┐                ┌──────────────────────────────────────┐
//!  │ Clock         │  wake(t)       │ Scheduler                            │
//!  │ (TokioClock)  ├───────────────►│  - state record (policy, cursor,     │
//!  └───────▲───────┘                │    counters, armed wake)             │
//!          │ after(next - now)      │  - ReentryGuard (in-flight ticks)    │
//!          └────────────────────────┤  - RunQueue (LIFO)                   │
//!                                   └──────┬───────────────────────┬───────┘
//!                                          │ drain()               │ publish
//!                                          ▼                       ▼
//!                                   ┌──────────────┐   ┌──────────────────────┐
//!                                   │ Task (user   │   │ Bus (broadcast)      │
//!                                   │  callback)   │   └──────────┬───────────┘
//!                                   └──────────────┘              ▼
//!                                                          SubscriberSet
//!                                                      ┌──────────┼──────────┐
//!                                                      ▼          ▼          ▼
//!                                                  LogWriter   worker 2   worker N
//! ```
//!
//! ### Tick lifecycle
//! ```text
//! wake(t)
//!   ├─► skip if t is claimed or no longer the next tick
//!   ├─► claim t, queue a run for t, scheduled += 1
//!   ├─► arm the wake for the next tick (or suspend)
//!   └─► drain (or defer to the drain already in flight)
//!
//! drain {
//!   pop newest run
//!   ├─ age > deadline ──► failure += 1, RunExpired
//!   └─ invoke callback
//!        ├─ Ok          ──► success += 1, RunSucceeded
//!        └─ Err / panic ──► failure += 1, RunFailed
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                      |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------|
//! | **Scheduling**    | Drift-free recurring execution with live reconfiguration.     | [`Scheduler`], [`ScheduleState`]        |
//! | **Policies**      | Period, occurrence limit, concurrency, staleness deadline.    | [`SchedulePolicy`], [`Deadline`]        |
//! | **Tasks**         | Define callbacks as closures or trait objects.                | [`Task`], [`TaskFn`], [`TaskRef`]       |
//! | **Clock**         | Pluggable time source and wake-up primitive.                  | [`Clock`], [`TokioClock`]               |
//! | **Subscriber API**| Hook into tick and run events (logging, metrics, custom).     | [`Subscribe`], [`LogWriter`]            |
//! | **Errors**        | Typed errors for callbacks, failed runs and shutdown.         | [`TaskError`], [`RunFailure`], [`RuntimeError`] |
//! | **Configuration** | Centralize runtime settings.                                  | [`SchedulerConfig`]                     |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tickvisor::{Deadline, LogWriter, SchedulePolicy, Scheduler, Subscribe, TaskError, TaskFn};
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = TaskFn::arc("report", || async {
//!         tokio::time::sleep(Duration::from_millis(30)).await;
//!         Ok::<_, TaskError>(())
//!     });
//!
//!     let policy = SchedulePolicy::every(Duration::from_millis(100))
//!         .with_allow_concurrent(false)
//!         .with_max_occurrences(Some(5))
//!         .with_deadline(Deadline::After(Duration::from_millis(250)));
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     let sched = Scheduler::builder(report, policy)
//!         .with_subscribers(subs)
//!         .build();
//!
//!     tokio::time::sleep(Duration::from_millis(650)).await;
//!
//!     let state = sched.state();
//!     assert!(state.is_suspended);
//!     assert_eq!(state.scheduled_count, 5);
//!     assert_eq!(state.success_count, 5);
//!
//!     sched.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod clock;
mod config;
mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use clock::{Clock, TokioClock, WakeHandle};
pub use config::SchedulerConfig;
pub use core::{ScheduleState, Scheduler, SchedulerBuilder};
pub use error::{RunFailure, RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{Deadline, SchedulePolicy};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};
