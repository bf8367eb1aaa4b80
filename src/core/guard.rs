//! # Reentry guard.
//!
//! [`ReentryGuard`] is the set of nominal tick instants currently being
//! processed. A tick is claimed by the wake handler and released by dropping
//! the returned [`TickClaim`], so release happens on every exit path,
//! including callback failure and panics unwinding through the drain loop.
//!
//! ```text
//! try_claim(t) ──► None                     (t already claimed: duplicate wake)
//!              └─► Some(Claimed { claim, had_others })
//!                         └─ drop(claim) ──► release(t) ──► notify idle if empty
//! ```

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::time::Instant;

/// Set of in-flight ticks.
#[derive(Debug, Default)]
pub(crate) struct ReentryGuard {
    claimed: Mutex<HashSet<Instant>>,
    idle: Notify,
}

/// Successful claim of one tick.
pub(crate) struct Claimed<'a> {
    /// Releases the tick when dropped.
    pub claim: TickClaim<'a>,
    /// Whether another tick was in flight before this claim.
    pub had_others: bool,
}

/// Scoped ownership of one claimed tick.
#[must_use = "dropping the claim releases the tick immediately"]
pub(crate) struct TickClaim<'a> {
    guard: &'a ReentryGuard,
    when: Instant,
}

impl ReentryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Instant>> {
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` if `when` is currently claimed.
    pub fn is_claimed(&self, when: Instant) -> bool {
        self.lock().contains(&when)
    }

    /// Claims `when` unless it is already claimed.
    ///
    /// `had_others` is measured before inserting `when`.
    pub fn try_claim(&self, when: Instant) -> Option<Claimed<'_>> {
        let mut claimed = self.lock();
        let had_others = !claimed.is_empty();
        if !claimed.insert(when) {
            return None;
        }
        Some(Claimed {
            claim: TickClaim { guard: self, when },
            had_others,
        })
    }

    /// Number of ticks in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no tick is in flight.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Completes once no tick is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.is_empty() {
                return;
            }
            notified.await;
        }
    }

    fn release(&self, when: Instant) {
        let mut claimed = self.lock();
        claimed.remove(&when);
        if claimed.is_empty() {
            self.idle.notify_waiters();
        }
    }
}

impl Drop for TickClaim<'_> {
    fn drop(&mut self) {
        self.guard.release(self.when);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_claim_is_exclusive_per_tick() {
        let guard = ReentryGuard::new();
        let t = Instant::now();

        let first = guard.try_claim(t).expect("first claim");
        assert!(!first.had_others);
        assert!(guard.try_claim(t).is_none());
        assert!(guard.is_claimed(t));

        drop(first);
        assert!(!guard.is_claimed(t));
        assert!(guard.try_claim(t).is_some());
    }

    #[test]
    fn test_had_others_is_measured_before_claim() {
        let guard = ReentryGuard::new();
        let t = Instant::now();

        let a = guard.try_claim(t).expect("a");
        let b = guard.try_claim(t + Duration::from_millis(1)).expect("b");
        assert!(!a.had_others);
        assert!(b.had_others);
        assert_eq!(guard.len(), 2);
        assert!(guard.is_claimed(t + Duration::from_millis(1)));
    }

    #[test]
    fn test_claim_released_on_unwind() {
        let guard = ReentryGuard::new();
        let t = Instant::now();

        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _claimed = guard.try_claim(t).expect("claim");
            panic!("callback blew up");
        }));
        assert!(res.is_err());
        assert!(guard.is_empty());
    }

    #[tokio::test]
    async fn test_wait_idle_completes_on_last_release() {
        let guard = Arc::new(ReentryGuard::new());
        let t = Instant::now();
        let claimed = guard.try_claim(t).expect("claim");

        let waiter = tokio::spawn({
            let guard = Arc::clone(&guard);
            async move { guard.wait_idle().await }
        });
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(claimed);
        waiter.await.expect("waiter");
    }
}
