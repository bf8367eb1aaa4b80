//! Scheduler core: cadence, reentry control and execution.
//!
//! The only public API from this module is [`Scheduler`] (with its
//! [`SchedulerBuilder`]) and the [`ScheduleState`] snapshot.
//!
//! Internal modules:
//! - [`cursor`]: pure cadence math (anchoring, next absolute tick, suspension);
//! - [`guard`]: reentry guard over in-flight ticks;
//! - [`queue`]: LIFO run queue shared by every drain loop;
//! - [`runner`]: drains the queue, expires stale runs, invokes the callback;
//! - [`scheduler`]: the state record, wake handler and control surface;
//! - [`builder`]: wiring of bus, subscribers and clock.

mod builder;
mod cursor;
mod guard;
mod queue;
mod runner;
mod scheduler;
mod state;

pub use builder::SchedulerBuilder;
pub use scheduler::Scheduler;
pub use state::ScheduleState;
