//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: the zero-argument async callback a
//! [`Scheduler`](crate::Scheduler) fires on every tick. The common handle type
//! is [`TaskRef`](crate::TaskRef), an `Arc<dyn Task>` suitable for sharing
//! across concurrent drain loops.

use std::future::Future;
use std::pin::Pin;

use crate::error::TaskError;

/// Boxed future produced by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// # Asynchronous unit of scheduled work.
///
/// A `Task` has a stable [`name`](Task::name) and produces a **fresh** future per
/// run via [`spawn`](Task::spawn). When concurrency is allowed, several futures
/// from the same task may be in flight at once.
///
/// # Example
/// ```
/// use tickvisor::{BoxTaskFuture, Task};
///
/// struct Heartbeat;
///
/// impl Task for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     fn spawn(&self) -> BoxTaskFuture {
///         Box::pin(async move {
///             // send a ping...
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates the future for one run.
    ///
    /// `Err(_)` and panics are both counted as failures; neither stops the schedule.
    fn spawn(&self) -> BoxTaskFuture;
}
