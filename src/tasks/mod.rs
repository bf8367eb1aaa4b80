//! # Task abstractions.
//!
//! This module provides the callback types the scheduler fires:
//! - [`Task`] - trait for async scheduled work
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task};
pub use task_fn::{TaskFn, TaskRef};
