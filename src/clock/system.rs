//! # Tokio-backed clock.
//!
//! [`TokioClock`] reads `tokio::time::Instant::now()` and spawns one small task
//! per armed wake:
//!
//! ```text
//! after(delay, wake)
//!   └─► tokio::spawn
//!         select! (biased)
//!           ├─ token.cancelled()         → return (wake dropped)
//!           └─ sleep_until(now + delay)  → wake.await (not cancellable anymore)
//! ```
//!
//! A delay that overflows `Instant` never elapses; such a wake only ends by
//! cancellation.
//!
//! Must be used from within a tokio runtime.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::time::{self, Instant};

use super::{Clock, WakeHandle};

/// Clock over `tokio::time`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl TokioClock {
    /// Construct a new [`TokioClock`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn after(&self, delay: Duration, wake: BoxFuture<'static, ()>) -> WakeHandle {
        let handle = WakeHandle::new();
        let token = handle.token().clone();
        let at = Instant::now().checked_add(delay);

        tokio::spawn(async move {
            let elapsed = async {
                match at {
                    Some(at) => time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = elapsed => {}
            }
            wake.await;
        });
        handle
    }
}
