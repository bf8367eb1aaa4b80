//! # Execution loop.
//!
//! [`drain`] pops runs from the shared [`RunQueue`](crate::core::queue::RunQueue)
//! until it observes the queue empty. Each popped run is either expired or
//! executed:
//!
//! ```text
//! loop {
//!   pop newest run ── None ──► return
//!   age = now - run.when
//!   age > deadline ──► failure += 1, publish RunExpired (callback not invoked)
//!   otherwise:
//!     last_run_at = now, publish RunStarting
//!     run_once(task) ── Ok  ──► success += 1, publish RunSucceeded
//!                    └─ Err ──► failure += 1, publish RunFailed
//! }
//! ```
//!
//! ## Rules
//! - Callback errors and panics are **counted, never propagated**.
//! - The task is looked up per run, so a swapped callback applies to runs
//!   that were queued before the swap.
//! - The state lock is never held while the callback runs.

use std::sync::Arc;

use futures::FutureExt;

use crate::core::queue::QueuedRun;
use crate::core::scheduler::Inner;
use crate::error::{RunFailure, TaskError};
use crate::events::{Event, EventKind};
use crate::subscribers::panic_message;
use crate::tasks::{Task, TaskRef};

/// Decision taken for one popped run.
enum Step {
    Expired,
    Execute { task: TaskRef, name: Arc<str> },
}

/// Drains the run queue until it is observed empty.
pub(crate) async fn drain(inner: &Inner) {
    while let Some(run) = inner.queue.pop() {
        let (task, name) = match prepare(inner, run) {
            Step::Expired => continue,
            Step::Execute { task, name } => (task, name),
        };

        let res = run_once(task.as_ref()).await;
        finish(inner, run, name, res);
    }
}

/// Executes one callback invocation, turning a panic into [`TaskError::Panicked`].
pub(crate) async fn run_once<T: Task + ?Sized>(task: &T) -> Result<(), TaskError> {
    match std::panic::AssertUnwindSafe(task.spawn()).catch_unwind().await {
        Ok(res) => res,
        Err(panic_err) => Err(TaskError::Panicked {
            info: panic_message(&*panic_err),
        }),
    }
}

/// Deadline check and bookkeeping before the callback runs.
fn prepare(inner: &Inner, run: QueuedRun) -> Step {
    let now = inner.clock.now();
    let age = now.saturating_duration_since(run.when);

    let mut core = inner.lock();
    let name = core.task_name();
    let period = core.policy.effective_period();

    if core.policy.deadline.is_exceeded(age, period) {
        core.counters.failure += 1;
        let deadline = core.policy.deadline.resolve(period).unwrap_or_default();
        let failure = RunFailure::Stale { age, deadline };
        inner.bus.publish(
            Event::new(EventKind::RunExpired)
                .with_task(name)
                .with_when(run.when)
                .with_age(age)
                .with_deadline(deadline)
                .with_reason(failure.as_label()),
        );
        return Step::Expired;
    }

    core.counters.last_run_at = Some(now);
    inner.bus.publish(
        Event::new(EventKind::RunStarting)
            .with_task(Arc::clone(&name))
            .with_when(run.when)
            .with_age(age),
    );
    Step::Execute {
        task: Arc::clone(&core.task),
        name,
    }
}

/// Counts the outcome of one callback invocation.
fn finish(inner: &Inner, run: QueuedRun, name: Arc<str>, res: Result<(), TaskError>) {
    let mut core = inner.lock();
    match res {
        Ok(()) => {
            core.counters.success += 1;
            inner.bus.publish(
                Event::new(EventKind::RunSucceeded)
                    .with_task(name)
                    .with_when(run.when),
            );
        }
        Err(e) => {
            core.counters.failure += 1;
            let failure = RunFailure::from(e);
            inner.bus.publish(
                Event::new(EventKind::RunFailed)
                    .with_task(name)
                    .with_when(run.when)
                    .with_reason(failure.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;

    #[tokio::test]
    async fn test_run_once_passes_through_results() {
        let ok = TaskFn::arc("ok", || async { Ok(()) });
        let bad = TaskFn::arc("bad", || async { Err(TaskError::fail("nope")) });

        assert_eq!(run_once(ok.as_ref()).await, Ok(()));
        assert_eq!(run_once(bad.as_ref()).await, Err(TaskError::fail("nope")));
    }

    #[tokio::test]
    async fn test_run_once_catches_panics() {
        let boom = TaskFn::arc("boom", || async {
            panic!("callback exploded");
            #[allow(unreachable_code)]
            Ok(())
        });

        assert_eq!(
            run_once(boom.as_ref()).await,
            Err(TaskError::Panicked {
                info: "callback exploded".into()
            })
        );
    }
}
