//! # Schedule cursor and its reconciliation.
//!
//! The cursor holds the last and next **absolute** fire instants. It is only
//! ever recomputed by [`reconcile`], a pure function of the old cursor, the
//! current policy, the scheduled count and "now":
//!
//! ```text
//! reconcile(old, policy, scheduled, now)
//!   ├─ suspended (flag / occurrences reached / no period)
//!   │     → cursor = {None, None}, Disarm
//!   ├─ old.last == None
//!   │     → last = now (anchor the grid), next = now + period, Arm(next)
//!   ├─ otherwise
//!   │     → next = old.last + period, Arm(next)
//!   └─ next not representable as an Instant
//!         → keep last, next = None, Disarm (the schedule never fires)
//! ```
//!
//! ## Rules
//! - The grid is anchored **once**, on (re)activation; later recomputations
//!   always start from `last_fire_at`, never from `now`.
//! - `now` is read only when anchoring.
//! - `next_fire_at` may lie in the past (catch-up); the wake is then armed
//!   with a zero delay.

use std::time::Duration;

use tokio::time::Instant;

use crate::policies::SchedulePolicy;

/// Last/next absolute fire instants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    /// Nominal instant of the last tick (or the anchor).
    pub last_fire_at: Option<Instant>,
    /// Nominal instant of the next tick.
    pub next_fire_at: Option<Instant>,
}

impl Cursor {
    /// Returns `true` if no grid is anchored.
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.last_fire_at.is_none()
    }
}

/// What to do with the clock wake after reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WakeAction {
    /// Make sure exactly one wake is armed for this instant.
    Arm(Instant),
    /// Make sure no wake is armed.
    Disarm,
}

/// Suspension edge crossed by a reconciliation, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    /// An anchored grid was dropped.
    Suspended,
    /// A new grid was anchored; carries the delay until the first tick.
    Resumed(Duration),
}

/// Result of [`reconcile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Plan {
    pub cursor: Cursor,
    pub wake: WakeAction,
    pub transition: Option<Transition>,
}

/// Computes the cursor and wake action for the current policy.
pub(crate) fn reconcile(
    old: Cursor,
    policy: &SchedulePolicy,
    scheduled: u64,
    now: Instant,
) -> Plan {
    let period = match policy.effective_period() {
        Some(p) if !policy.is_suspended(scheduled) => p,
        _ => {
            return Plan {
                cursor: Cursor::default(),
                wake: WakeAction::Disarm,
                transition: (!old.is_cleared()).then_some(Transition::Suspended),
            };
        }
    };

    let (last, transition) = match old.last_fire_at {
        Some(last) => (last, None),
        None => (now, Some(Transition::Resumed(period))),
    };
    let next = last.checked_add(period);

    Plan {
        cursor: Cursor {
            last_fire_at: Some(last),
            next_fire_at: next,
        },
        wake: next.map_or(WakeAction::Disarm, WakeAction::Arm),
        transition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn anchored(last: Instant, period: Duration) -> Cursor {
        Cursor {
            last_fire_at: Some(last),
            next_fire_at: Some(last + period),
        }
    }

    #[test]
    fn test_first_activation_anchors_at_now() {
        let now = Instant::now();
        let plan = reconcile(
            Cursor::default(),
            &SchedulePolicy::every(ms(500)),
            0,
            now,
        );
        assert_eq!(plan.cursor, anchored(now, ms(500)));
        assert_eq!(plan.wake, WakeAction::Arm(now + ms(500)));
        assert_eq!(plan.transition, Some(Transition::Resumed(ms(500))));
    }

    #[test]
    fn test_recompute_keeps_anchor_not_now() {
        let t0 = Instant::now();
        let old = anchored(t0, ms(500));
        let later = t0 + ms(300);

        let plan = reconcile(old, &SchedulePolicy::every(ms(1000)), 1, later);
        assert_eq!(plan.cursor.last_fire_at, Some(t0));
        assert_eq!(plan.wake, WakeAction::Arm(t0 + ms(1000)));
        assert_eq!(plan.transition, None);
    }

    #[test]
    fn test_shorter_period_may_arm_in_the_past() {
        let t0 = Instant::now();
        let old = anchored(t0, ms(500));
        let plan = reconcile(old, &SchedulePolicy::every(ms(80)), 2, t0 + ms(200));
        assert_eq!(plan.wake, WakeAction::Arm(t0 + ms(80)));
    }

    #[test]
    fn test_same_policy_is_idempotent() {
        let t0 = Instant::now();
        let policy = SchedulePolicy::every(ms(250));
        let first = reconcile(Cursor::default(), &policy, 0, t0);
        let second = reconcile(first.cursor, &policy, 0, t0 + ms(100));
        assert_eq!(first.cursor, second.cursor);
        assert_eq!(first.wake, second.wake);
    }

    #[test]
    fn test_suspension_clears_cursor() {
        let t0 = Instant::now();
        let old = anchored(t0, ms(500));

        for policy in [
            SchedulePolicy::new(None),
            SchedulePolicy::every(Duration::ZERO),
            SchedulePolicy::every(ms(500)).with_suspend(true),
            SchedulePolicy::every(ms(500)).with_max_occurrences(Some(3)),
        ] {
            let plan = reconcile(old, &policy, 3, t0);
            assert_eq!(plan.cursor, Cursor::default());
            assert_eq!(plan.wake, WakeAction::Disarm);
            assert_eq!(plan.transition, Some(Transition::Suspended));
        }
    }

    #[test]
    fn test_staying_suspended_has_no_transition() {
        let plan = reconcile(
            Cursor::default(),
            &SchedulePolicy::new(None),
            0,
            Instant::now(),
        );
        assert_eq!(plan.transition, None);
        assert_eq!(plan.wake, WakeAction::Disarm);
    }

    #[test]
    fn test_resume_after_suspension_reanchors() {
        let t0 = Instant::now();
        let suspended = reconcile(
            anchored(t0, ms(500)),
            &SchedulePolicy::new(None),
            2,
            t0 + ms(700),
        );
        let resumed = reconcile(
            suspended.cursor,
            &SchedulePolicy::every(ms(500)),
            2,
            t0 + ms(900),
        );
        assert_eq!(resumed.cursor.last_fire_at, Some(t0 + ms(900)));
        assert_eq!(resumed.wake, WakeAction::Arm(t0 + ms(1400)));
    }

    #[test]
    fn test_unrepresentable_next_tick_keeps_anchor_and_disarms() {
        let t0 = Instant::now();
        let huge = SchedulePolicy::every(Duration::MAX);

        let first = reconcile(Cursor::default(), &huge, 0, t0);
        assert_eq!(first.cursor.last_fire_at, Some(t0));
        assert_eq!(first.cursor.next_fire_at, None);
        assert_eq!(first.wake, WakeAction::Disarm);

        let running = reconcile(anchored(t0, ms(500)), &huge, 3, t0 + ms(700));
        assert_eq!(running.cursor.last_fire_at, Some(t0));
        assert_eq!(running.wake, WakeAction::Disarm);
        assert_eq!(running.transition, None);

        let back = reconcile(running.cursor, &SchedulePolicy::every(ms(500)), 3, t0 + ms(900));
        assert_eq!(back.wake, WakeAction::Arm(t0 + ms(500)));
    }
}
