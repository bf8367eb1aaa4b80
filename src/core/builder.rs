use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::{Clock, TokioClock},
    config::SchedulerConfig,
    events::{Bus, Event},
    policies::SchedulePolicy,
    subscribers::{Subscribe, SubscriberSet},
    tasks::TaskRef,
};

use super::scheduler::{Inner, Scheduler};

/// Builder for constructing a [`Scheduler`] with optional features.
pub struct SchedulerBuilder {
    task: TaskRef,
    policy: SchedulePolicy,
    cfg: SchedulerConfig,
    clock: Arc<dyn Clock>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl SchedulerBuilder {
    /// Creates a builder with the default config and the tokio clock.
    pub fn new(task: TaskRef, policy: SchedulePolicy) -> Self {
        Self {
            task,
            policy,
            cfg: SchedulerConfig::default(),
            clock: Arc::new(TokioClock::new()),
            subscribers: Vec::new(),
        }
    }

    /// Sets the runtime configuration.
    pub fn with_config(mut self, cfg: SchedulerConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replaces the clock the scheduler reads time from and arms wakes on.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events (ticks, runs, suspension, ...)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the scheduler and arms its first wake.
    ///
    /// Must be called inside a tokio runtime. When the policy has a period
    /// and is not suspended, the grid is anchored at the current instant.
    pub fn build(self) -> Scheduler {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener = (!self.subscribers.is_empty()).then(|| {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Listener::spawn(bus.subscribe(), set)
        });

        let inner = Inner::new(self.task, self.policy, self.clock, bus);
        inner.activate();
        Scheduler::from_parts(inner, self.cfg, listener)
    }
}

/// Task forwarding bus events to the subscriber set.
///
/// Runs until [`close`](Listener::close); events already buffered on the bus
/// are forwarded first, then every subscriber worker is drained and joined.
pub(crate) struct Listener {
    closed: CancellationToken,
    handle: JoinHandle<()>,
}

impl Listener {
    fn spawn(rx: broadcast::Receiver<Event>, set: SubscriberSet) -> Self {
        let closed = CancellationToken::new();
        let handle = tokio::spawn(subscriber_listener(rx, set, closed.clone()));
        Self { closed, handle }
    }

    /// Asks the listener to stop once the bus buffer is empty.
    pub(crate) fn close(&self) {
        self.closed.cancel();
    }

    /// Stops the listener and waits until every subscriber worker has finished.
    pub(crate) async fn join(self) {
        self.close();
        let _ = self.handle.await;
    }
}

async fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    closed: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            res = rx.recv() => match res {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            },
            _ = closed.cancelled() => break,
        }
    }
    set.shutdown().await;
}
