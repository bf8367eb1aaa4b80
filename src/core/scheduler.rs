//! # Scheduler: drift-free recurring execution of one task.
//!
//! The [`Scheduler`] owns a single state record (policy, cursor, counters,
//! armed wake), the [`ReentryGuard`] and the [`RunQueue`]. The clock wakes it
//! at the next **absolute** tick; the wake handler claims the tick, queues a
//! run, advances the cursor from the previous tick and either drains the
//! queue or leaves the run to a drain that is already in flight.
//!
//! ## Wake handler
//! ```text
//! clock wake(t)
//!   ├─► t already claimed            → TickSkipped("claimed"), return
//!   ├─► cursor.next != t / stopped   → TickSkipped("superseded"), return
//!   ├─► claim t (had_others = guard was non-empty)
//!   ├─► queue.push(t)
//!   ├─► cursor.last = t; scheduled += 1; publish TickScheduled
//!   ├─► reconcile → arm next wake (or suspend)
//!   ├─► !allow_concurrent && had_others
//!   │       → release t, publish TickDeferred, return (run stays queued)
//!   └─► runner::drain() → release t
//! ```
//!
//! ## Locking
//! - `core` is locked for short synchronous sections only, never across a callback.
//! - Lock order is `core` → `guard` → `queue`; drain loops take `queue` and
//!   `core` one at a time.
//!
//! ## Cancellation
//! Reconfiguration, reset, drop and shutdown cancel the armed wake. None of
//! them cancels a callback that is already running; it completes and still
//! updates the counters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;

use crate::clock::{Clock, WakeHandle};
use crate::config::SchedulerConfig;
use crate::core::builder::{Listener, SchedulerBuilder};
use crate::core::cursor::{self, Cursor, Transition, WakeAction};
use crate::core::guard::ReentryGuard;
use crate::core::queue::{QueuedRun, RunQueue};
use crate::core::runner;
use crate::core::state::{Counters, ScheduleState};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::SchedulePolicy;
use crate::tasks::TaskRef;

/// The wake currently armed on the clock.
struct ArmedWake {
    at: Instant,
    handle: WakeHandle,
}

/// Mutable state guarded by one lock.
pub(crate) struct Core {
    pub task: TaskRef,
    pub policy: SchedulePolicy,
    pub cursor: Cursor,
    pub counters: Counters,
    armed: Option<ArmedWake>,
    stopped: bool,
}

impl Core {
    pub(crate) fn task_name(&self) -> Arc<str> {
        Arc::from(self.task.name())
    }
}

/// Shared scheduler internals (held by the handle, armed wakes and drain loops).
pub(crate) struct Inner {
    pub clock: Arc<dyn Clock>,
    pub bus: Bus,
    pub guard: ReentryGuard,
    pub queue: RunQueue,
    core: Mutex<Core>,
}

/// Outcome of the synchronous part of a wake.
struct Tick<'a> {
    claim: crate::core::guard::TickClaim<'a>,
    drain_now: bool,
    task: Arc<str>,
}

impl Inner {
    pub(crate) fn new(
        task: TaskRef,
        policy: SchedulePolicy,
        clock: Arc<dyn Clock>,
        bus: Bus,
    ) -> Arc<Self> {
        Arc::new(Self {
            clock,
            bus,
            guard: ReentryGuard::new(),
            queue: RunQueue::new(),
            core: Mutex::new(Core {
                task,
                policy,
                cursor: Cursor::default(),
                counters: Counters::default(),
                armed: None,
                stopped: false,
            }),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-derives the cursor from the current policy and arms/disarms the wake.
    pub(crate) fn activate(self: &Arc<Self>) {
        let mut core = self.lock();
        self.apply(&mut core);
    }

    fn apply(self: &Arc<Self>, core: &mut Core) {
        let now = self.clock.now();
        let plan = cursor::reconcile(core.cursor, &core.policy, core.counters.scheduled, now);
        core.cursor = plan.cursor;

        match plan.wake {
            WakeAction::Arm(at) if !core.stopped => self.arm(core, at, now),
            _ => self.disarm(core),
        }

        match plan.transition {
            Some(Transition::Suspended) => self.bus.publish(
                Event::new(EventKind::Suspended)
                    .with_task(core.task_name())
                    .with_count(core.counters.scheduled),
            ),
            Some(Transition::Resumed(delay)) => self.bus.publish(
                Event::new(EventKind::Resumed)
                    .with_task(core.task_name())
                    .with_delay(delay),
            ),
            None => {}
        }
    }

    fn arm(self: &Arc<Self>, core: &mut Core, at: Instant, now: Instant) {
        if core.armed.as_ref().is_some_and(|w| w.at == at) {
            return;
        }
        self.disarm(core);

        let delay = at.saturating_duration_since(now);
        let handle = self.clock.after(delay, self.wake_future(at));
        core.armed = Some(ArmedWake { at, handle });
    }

    fn disarm(&self, core: &mut Core) {
        if let Some(w) = core.armed.take() {
            self.clock.cancel(w.handle);
        }
    }

    fn wake_future(self: &Arc<Self>, at: Instant) -> BoxFuture<'static, ()> {
        let me = Arc::clone(self);
        async move { me.on_wake(at).await }.boxed()
    }

    async fn on_wake(self: Arc<Self>, when: Instant) {
        let Some(tick) = self.begin_tick(when) else {
            return;
        };

        if !tick.drain_now {
            drop(tick.claim);
            self.bus.publish(
                Event::new(EventKind::TickDeferred)
                    .with_task(tick.task)
                    .with_when(when),
            );
            return;
        }

        runner::drain(&self).await;
        drop(tick.claim);
    }

    /// Steps 1-6 of the wake handler, under the state lock.
    fn begin_tick(self: &Arc<Self>, when: Instant) -> Option<Tick<'_>> {
        let mut core = self.lock();
        let task = core.task_name();

        if core.armed.as_ref().is_some_and(|w| w.at == when) {
            core.armed = None;
        }
        let skipped = if self.guard.is_claimed(when) {
            Some("claimed")
        } else if core.stopped || core.cursor.next_fire_at != Some(when) {
            Some("superseded")
        } else {
            None
        };
        if let Some(reason) = skipped {
            self.bus.publish(
                Event::new(EventKind::TickSkipped)
                    .with_task(task)
                    .with_when(when)
                    .with_reason(reason),
            );
            return None;
        }

        let claimed = self.guard.try_claim(when)?;
        self.queue.push(QueuedRun { when });
        core.cursor.last_fire_at = Some(when);
        core.counters.scheduled += 1;
        self.bus.publish(
            Event::new(EventKind::TickScheduled)
                .with_task(Arc::clone(&task))
                .with_when(when)
                .with_count(core.counters.scheduled),
        );

        self.apply(&mut core);

        Some(Tick {
            claim: claimed.claim,
            drain_now: core.policy.allow_concurrent || !claimed.had_others,
            task,
        })
    }

    fn stop(&self) {
        let mut core = self.lock();
        core.stopped = true;
        self.disarm(&mut core);
    }
}

/// Recurring scheduler for one task.
///
/// Created with [`Scheduler::new`] or [`Scheduler::builder`]; must be created
/// inside a tokio runtime. Dropping the scheduler cancels the armed wake and
/// stops the subscriber listener; in-flight callbacks still run to completion.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tickvisor::{Scheduler, SchedulePolicy, TaskFn, TaskError};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() {
///     let task = TaskFn::arc("heartbeat", || async { Ok::<_, TaskError>(()) });
///     let sched = Scheduler::new(task, SchedulePolicy::every(Duration::from_millis(500)));
///
///     tokio::time::sleep(Duration::from_millis(5250)).await;
///
///     let state = sched.state();
///     assert_eq!(state.scheduled_count, 10);
///     assert_eq!(state.success_count, 10);
/// }
/// ```
pub struct Scheduler {
    inner: Arc<Inner>,
    cfg: SchedulerConfig,
    listener: Option<Listener>,
}

impl Scheduler {
    /// Returns a builder for a scheduler firing `task` under `policy`.
    pub fn builder(task: TaskRef, policy: SchedulePolicy) -> SchedulerBuilder {
        SchedulerBuilder::new(task, policy)
    }

    /// Creates a scheduler with the default clock, config and no subscribers.
    pub fn new(task: TaskRef, policy: SchedulePolicy) -> Self {
        Self::builder(task, policy).build()
    }

    pub(crate) fn from_parts(
        inner: Arc<Inner>,
        cfg: SchedulerConfig,
        listener: Option<Listener>,
    ) -> Self {
        Self {
            inner,
            cfg,
            listener,
        }
    }

    /// Returns a consistent snapshot of suspension and counters.
    pub fn state(&self) -> ScheduleState {
        let core = self.inner.lock();
        let suspended = core.policy.is_suspended(core.counters.scheduled);
        ScheduleState::new(&core.counters, suspended)
    }

    /// Returns the current policy.
    pub fn policy(&self) -> SchedulePolicy {
        self.inner.lock().policy
    }

    /// Nominal instant of the next tick (`None` while suspended).
    pub fn next_fire_at(&self) -> Option<Instant> {
        self.inner.lock().cursor.next_fire_at
    }

    /// Nominal instant of the last tick or the grid anchor.
    pub fn last_fire_at(&self) -> Option<Instant> {
        self.inner.lock().cursor.last_fire_at
    }

    /// Number of ticks whose processing is in flight.
    pub fn in_flight(&self) -> usize {
        self.inner.guard.len()
    }

    /// Number of runs waiting in the queue.
    pub fn queued(&self) -> usize {
        self.inner.queue.len()
    }

    /// Replaces the policy.
    ///
    /// Counters are kept and the cadence stays anchored to the last tick;
    /// suspension is re-evaluated and the wake re-armed as needed.
    pub fn set_policy(&self, policy: SchedulePolicy) {
        self.update_policy(|p| *p = policy);
    }

    /// Edits the policy in place; same semantics as [`set_policy`](Self::set_policy).
    pub fn update_policy(&self, f: impl FnOnce(&mut SchedulePolicy)) {
        let mut core = self.inner.lock();
        f(&mut core.policy);
        self.inner
            .bus
            .publish(Event::new(EventKind::PolicyUpdated).with_task(core.task_name()));
        self.inner.apply(&mut core);
    }

    /// Swaps the callback. The cadence is untouched; queued runs use the new task.
    pub fn set_task(&self, task: TaskRef) {
        let mut core = self.inner.lock();
        core.task = task;
        self.inner
            .bus
            .publish(Event::new(EventKind::TaskReplaced).with_task(core.task_name()));
    }

    /// Zeroes all counters, clears `last_run_at` and the cursor.
    ///
    /// Unless suspended, a new grid is anchored at the current instant.
    pub fn reset(&self) {
        let mut core = self.inner.lock();
        core.counters = Counters::default();
        core.cursor = Cursor::default();
        self.inner.disarm(&mut core);
        self.inner
            .bus
            .publish(Event::new(EventKind::CountersReset).with_task(core.task_name()));
        self.inner.apply(&mut core);
    }

    /// Returns a receiver of raw scheduler events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.inner.bus.subscribe()
    }

    /// Stops scheduling and waits up to the configured grace for in-flight runs.
    ///
    /// Runs still queued are abandoned. Subscribers receive every event up to
    /// the final `AllStoppedWithin`/`GraceExceeded` and are joined before
    /// this returns.
    pub async fn shutdown(mut self) -> Result<(), RuntimeError> {
        self.inner.stop();
        self.inner
            .bus
            .publish(Event::new(EventKind::ShutdownRequested));

        let grace = self.cfg.grace;
        let res = match tokio::time::timeout(grace, self.inner.guard.wait_idle()).await {
            Ok(()) => {
                self.inner
                    .bus
                    .publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_elapsed) => {
                let in_flight = self.inner.guard.len();
                self.inner
                    .bus
                    .publish(Event::new(EventKind::GraceExceeded).with_count(in_flight as u64));
                Err(RuntimeError::GraceExceeded { grace, in_flight })
            }
        };

        if let Some(listener) = self.listener.take() {
            listener.join().await;
        }
        res
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.inner.stop();
        if let Some(listener) = &self.listener {
            listener.close();
        }
    }
}
