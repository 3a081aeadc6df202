// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-size worker pool used by the level-synchronous engines.
//!
//! Jobs are distributed over a crossbeam channel to a fixed set of OS
//! threads. [`WorkerPool::drain`] blocks until every submitted job has
//! completed; this wait is the only cross-level synchronization point of
//! the level-wise engine, and exceeding its timeout is fatal to the run. A
//! panicking job poisons the pool: the panic message is captured and
//! surfaced as a [`Concurrency`] error on the next drain, never retried.
//!
//! [`Concurrency`]: crate::core::error::HtpmError::Concurrency

use crate::core::error::{HtpmError, HtpmResult};
use crossbeam_channel::{unbounded, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    pending: Mutex<usize>,
    idle: Condvar,
    failure: Mutex<Option<String>>,
}

/// Fixed-size pool of worker threads
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    state: Arc<PoolState>,
}

impl WorkerPool {
    pub fn new(size: usize) -> HtpmResult<Self> {
        if size == 0 {
            return Err(HtpmError::validation_with_field(
                "worker pool size must be positive",
                "pool_size",
            ));
        }
        let (sender, receiver) = unbounded::<Job>();
        let state = Arc::new(PoolState {
            pending: Mutex::new(0),
            idle: Condvar::new(),
            failure: Mutex::new(None),
        });

        let workers = (0..size)
            .map(|index| {
                let receiver = receiver.clone();
                let state = Arc::clone(&state);
                std::thread::Builder::new()
                    .name(format!("htpm-worker-{index}"))
                    .spawn(move || {
                        while let Ok(job) = receiver.recv() {
                            let outcome = catch_unwind(AssertUnwindSafe(job));
                            if let Err(panic) = outcome {
                                let message = panic_message(&panic);
                                let mut failure =
                                    state.failure.lock().expect("pool lock poisoned");
                                failure.get_or_insert(message);
                            }
                            let mut pending = state.pending.lock().expect("pool lock poisoned");
                            *pending -= 1;
                            if *pending == 0 {
                                state.idle.notify_all();
                            }
                        }
                    })
                    .map_err(|e| HtpmError::concurrency(format!("failed to spawn worker: {e}")))
            })
            .collect::<HtpmResult<Vec<_>>>()?;

        Ok(Self {
            sender: Some(sender),
            workers,
            state,
        })
    }

    /// Submit a job for execution
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        {
            let mut pending = self.state.pending.lock().expect("pool lock poisoned");
            *pending += 1;
        }
        self.sender
            .as_ref()
            .expect("pool already shut down")
            .send(Box::new(job))
            .expect("worker channel closed");
    }

    /// Block until all submitted jobs have completed.
    ///
    /// Fails with a [`Concurrency`] error when a job panicked or when the
    /// timeout elapses with jobs still outstanding; both are fatal to the
    /// surrounding mining run.
    ///
    /// [`Concurrency`]: crate::core::error::HtpmError::Concurrency
    pub fn drain(&self, timeout: Duration) -> HtpmResult<()> {
        let deadline = Instant::now() + timeout;
        let mut pending = self.state.pending.lock().expect("pool lock poisoned");
        while *pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(HtpmError::concurrency(format!(
                    "worker pool drain timed out with {} jobs outstanding",
                    *pending
                )));
            }
            let (guard, wait) = self
                .state
                .idle
                .wait_timeout(pending, remaining)
                .expect("pool lock poisoned");
            pending = guard;
            if wait.timed_out() && *pending > 0 {
                return Err(HtpmError::concurrency(format!(
                    "worker pool drain timed out with {} jobs outstanding",
                    *pending
                )));
            }
        }
        drop(pending);

        let failure = self.state.failure.lock().expect("pool lock poisoned");
        if let Some(message) = failure.as_ref() {
            return Err(HtpmError::concurrency(format!(
                "mining task panicked: {message}"
            )));
        }
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel lets idle workers exit their recv loop.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_executes_all_jobs() {
        let pool = WorkerPool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..64 {
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
        pool.drain(Duration::from_secs(10)).unwrap();
        assert_eq!(counter.load(Ordering::Relaxed), 64);
    }

    #[test]
    fn test_panicking_job_fails_drain() {
        let pool = WorkerPool::new(2).unwrap();
        pool.execute(|| panic!("boom"));
        let err = pool.drain(Duration::from_secs(10)).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_drain_timeout() {
        let pool = WorkerPool::new(1).unwrap();
        pool.execute(|| std::thread::sleep(Duration::from_millis(500)));
        let err = pool.drain(Duration::from_millis(10)).unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
