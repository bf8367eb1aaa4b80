//! # Ticker Example
//!
//! Fires a heartbeat every 200ms for ten ticks with the built-in [`LogWriter`]
//! attached, then changes the period while the schedule is running.
//!
//! ## Run
//! ```bash
//! RUST_LOG=tickvisor=debug cargo run --example ticker
//! ```

use std::{sync::Arc, time::Duration};

use tickvisor::{LogWriter, SchedulePolicy, Scheduler, Subscribe, TaskError, TaskFn, TaskRef};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickvisor=info")),
        )
        .init();

    let heartbeat: TaskRef = TaskFn::arc("heartbeat", || async {
        println!("[heartbeat] tick");
        Ok::<_, TaskError>(())
    });

    let policy = SchedulePolicy::every(Duration::from_millis(200)).with_max_occurrences(Some(10));
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let sched = Scheduler::builder(heartbeat, policy)
        .with_subscribers(subs)
        .build();

    tokio::time::sleep(Duration::from_millis(700)).await;
    println!("slowing down to 400ms");
    sched.update_policy(|p| p.period = Some(Duration::from_millis(400)));

    tokio::time::sleep(Duration::from_secs(3)).await;

    let state = sched.state();
    println!();
    println!("State:");
    println!(" ├─► Scheduled: {}", state.scheduled_count);
    println!(" ├─► Succeeded: {}", state.success_count);
    println!(" ├─► Failed:    {}", state.failure_count);
    println!(" └─► Suspended: {}", state.is_suspended);

    sched.shutdown().await?;
    Ok(())
}
