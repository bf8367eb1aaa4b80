//! # Serial Backlog Example
//!
//! A 100ms schedule whose first run takes a full second while concurrency is
//! disallowed. Ticks that fire meanwhile are queued; when the slow run ends the
//! newest queued run executes and the older ones are discarded as stale.
//!
//! ## Run
//! ```bash
//! cargo run --example serial_backlog
//! ```

use std::{
    sync::Arc,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};

use tickvisor::{EventKind, SchedulePolicy, Scheduler, TaskError, TaskFn, TaskRef};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let counter = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&counter);
    let task: TaskRef = TaskFn::arc("report", move || {
        let counter = Arc::clone(&c);
        async move {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            println!("[report] run #{n} started");
            if n == 1 {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            println!("[report] run #{n} done");
            Ok::<_, TaskError>(())
        }
    });

    let policy = SchedulePolicy::every(Duration::from_millis(100)).with_allow_concurrent(false);
    let sched = Scheduler::new(task, policy);

    let mut rx = sched.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(ev) = rx.recv().await {
            match ev.kind {
                EventKind::TickDeferred => println!("[sched] tick deferred, run queued"),
                EventKind::RunExpired => println!(
                    "[sched] run expired: age={:?}ms deadline={:?}ms",
                    ev.age_ms, ev.deadline_ms
                ),
                _ => {}
            }
        }
    });

    tokio::time::sleep(Duration::from_millis(1450)).await;

    let state = sched.state();
    println!();
    println!("State:");
    println!(" ├─► Scheduled: {}", state.scheduled_count);
    println!(" ├─► Succeeded: {}", state.success_count);
    println!(" └─► Failed:    {}", state.failure_count);

    sched.shutdown().await?;
    // the bus closes once the last scheduler reference is gone
    printer.await?;
    Ok(())
}
