//! # Custom Subscriber Example
//!
//! Shows how to implement a custom event subscriber that tracks run metrics
//! for a flaky callback.
//!
//! The example counts:
//! - Ticks scheduled
//! - Successful runs
//! - Failed runs (errors and panics)
//!
//! ## Run
//! ```bash
//! cargo run --example subscriber
//! ```

use std::{
    sync::Arc,
    sync::atomic::{AtomicU32, AtomicU64, Ordering},
    time::Duration,
};

use tickvisor::{Event, EventKind, SchedulePolicy, Scheduler, Subscribe, TaskError, TaskFn, TaskRef};

struct MetricsSubscriber {
    ticks: AtomicU64,
    failures: AtomicU64,
    successes: AtomicU64,
}

impl MetricsSubscriber {
    fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            successes: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Metrics:");
        println!(" ├─► Ticks:     {}", self.ticks.load(Ordering::Relaxed));
        println!(" ├─► Failures:  {}", self.failures.load(Ordering::Relaxed));
        println!(" └─► Successes: {}", self.successes.load(Ordering::Relaxed));
    }
}

#[async_trait::async_trait]
impl Subscribe for MetricsSubscriber {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::TickScheduled => {
                self.ticks.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::RunSucceeded => {
                self.successes.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::RunFailed | EventKind::RunExpired => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "metrics"
    }

    fn queue_capacity(&self) -> usize {
        1024
    }
}

fn flaky_task() -> TaskRef {
    let counter = Arc::new(AtomicU32::new(0));

    TaskFn::arc("flaky", move || {
        let counter = Arc::clone(&counter);
        async move {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            tokio::time::sleep(Duration::from_millis(20)).await;

            match n % 3 {
                0 => Err(TaskError::fail(format!("run #{n} failed"))),
                _ => {
                    println!("[flaky] run #{n} ok");
                    Ok(())
                }
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let metrics = Arc::new(MetricsSubscriber::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![metrics.clone()];

    let policy = SchedulePolicy::every(Duration::from_millis(100)).with_max_occurrences(Some(9));
    let sched = Scheduler::builder(flaky_task(), policy)
        .with_subscribers(subs)
        .build();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    sched.shutdown().await?;

    // give subscriber workers a moment to drain their queues
    tokio::time::sleep(Duration::from_millis(50)).await;
    metrics.print_stats();
    Ok(())
}
