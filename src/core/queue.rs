//! # Run queue.
//!
//! [`RunQueue`] is the backlog of ticks waiting to be executed. It is a stack:
//! the most recently pushed run is popped first, so under backpressure the
//! oldest runs are the ones that age past their deadline.
//!
//! Every push/pop is a single short critical section; concurrent drain loops
//! never pop the same run twice and never lose one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;

/// One pending fire request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct QueuedRun {
    /// Nominal tick instant.
    pub when: Instant,
}

/// LIFO backlog shared by all drain loops.
#[derive(Debug, Default)]
pub(crate) struct RunQueue {
    runs: Mutex<Vec<QueuedRun>>,
}

impl RunQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QueuedRun>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, run: QueuedRun) {
        self.lock().push(run);
    }

    /// Pops the most recently pushed run.
    pub fn pop(&self) -> Option<QueuedRun> {
        self.lock().pop()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_pops_newest_first() {
        let q = RunQueue::new();
        let t0 = Instant::now();
        for i in 0..3 {
            q.push(QueuedRun {
                when: t0 + Duration::from_millis(i * 100),
            });
        }
        assert_eq!(q.pop().map(|r| r.when), Some(t0 + Duration::from_millis(200)));
        assert_eq!(q.pop().map(|r| r.when), Some(t0 + Duration::from_millis(100)));
        assert_eq!(q.pop().map(|r| r.when), Some(t0));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_concurrent_pops_never_duplicate() {
        let q = Arc::new(RunQueue::new());
        let t0 = Instant::now();
        for i in 0..1000 {
            q.push(QueuedRun {
                when: t0 + Duration::from_micros(i),
            });
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let q = Arc::clone(&q);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(run) = q.pop() {
                        mine.push(run.when);
                    }
                    mine
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for when in h.join().expect("popper thread") {
                assert!(seen.insert(when), "run popped twice");
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(q.len(), 0);
    }
}
