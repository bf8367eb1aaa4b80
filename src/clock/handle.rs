//! # Wake handle.
//!
//! [`WakeHandle`] identifies one armed wake and carries the
//! [`CancellationToken`] its clock waits on.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio_util::sync::CancellationToken;

/// Global id counter for wake handles.
static WAKE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Cancellation handle for one armed wake.
///
/// Cheap to clone; every clone cancels the same wake.
#[derive(Clone, Debug)]
pub struct WakeHandle {
    id: u64,
    token: CancellationToken,
}

impl WakeHandle {
    /// Creates a handle with a fresh id and token.
    pub fn new() -> Self {
        Self {
            id: WAKE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            token: CancellationToken::new(),
        }
    }

    /// Unique id of this wake.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Token the clock must observe while waiting.
    #[inline]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels the wake.
    #[inline]
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` if the wake was cancelled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for WakeHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = WakeHandle::new();
        let b = WakeHandle::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clones_share_cancellation() {
        let a = WakeHandle::new();
        let b = a.clone();
        b.cancel();
        assert!(a.is_cancelled());
    }
}
