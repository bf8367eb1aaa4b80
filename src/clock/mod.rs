//! # Clock source.
//!
//! The scheduler never reads time or sleeps directly; it goes through a
//! [`Clock`]. The clock supplies:
//! - `now()`: the current instant,
//! - `after(delay, wake)`: run `wake` once `delay` elapsed, returning a [`WakeHandle`],
//! - `cancel(handle)`: prevent a pending wake from running.
//!
//! ## Contents
//! - [`Clock`] the collaborator trait
//! - [`TokioClock`] default implementation over `tokio::time`
//! - [`WakeHandle`] cancellation handle for one armed wake
//!
//! Timestamps are [`tokio::time::Instant`], so a paused tokio runtime
//! (`test-util`) drives the whole scheduler deterministically.

mod handle;
mod system;

pub use handle::WakeHandle;
pub use system::TokioClock;

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::Instant;

/// Time source and one-shot wake-up primitive.
///
/// ### Rules
/// - A wake runs **at most once**.
/// - Once cancelled, a wake that has not started must never run.
/// - A wake that already started runs to completion; `cancel` does not abort it.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Arranges for `wake` to run after `delay`.
    ///
    /// A zero delay means "as soon as possible", never synchronously inside this call.
    fn after(&self, delay: Duration, wake: BoxFuture<'static, ()>) -> WakeHandle;

    /// Cancels a pending wake. Cancelling twice or after the wake ran is a no-op.
    fn cancel(&self, handle: WakeHandle) {
        handle.cancel();
    }
}
