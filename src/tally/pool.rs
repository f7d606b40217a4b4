//! Worker pool with a timeout-bounded completion barrier
//!
//! Threads are started on demand, one per submitted job that finds no free
//! worker, up to the pool limit. A large limit therefore costs nothing until
//! the work is there.
//!
//! Lifecycle: `submit` jobs → `await_termination` (closes the queue, then
//! waits until every submitted job finished or the timeout fired). On
//! timeout the pool is cancelled: jobs still queued are dropped unrun and the
//! worker threads are detached.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::tally::error::TallyError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// How the completion barrier was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Every submitted job ran to completion
    Drained,
    /// The wait expired; `abandoned` jobs were running or still queued
    TimedOut { abandoned: usize },
}

#[derive(Debug, Default)]
struct PoolState {
    pending: Mutex<usize>,
    drained: Condvar,
    cancelled: AtomicBool,
}

impl PoolState {
    fn lock_pending(&self) -> std::sync::MutexGuard<'_, usize> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decrements the pending count when a job is finished, dropped or panicked
struct PendingGuard<'a>(&'a PoolState);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut pending = self.0.lock_pending();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.0.drained.notify_all();
        }
    }
}

/// At most `limit` OS threads drawing jobs from one shared queue
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    receiver: Arc<Mutex<Receiver<Job>>>,
    workers: Vec<JoinHandle<()>>,
    limit: usize,
    state: Arc<PoolState>,
}

impl WorkerPool {
    /// Create a pool that runs up to `limit` jobs at once
    pub fn new(limit: NonZeroUsize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        Self {
            sender: Some(sender),
            receiver: Arc::new(Mutex::new(receiver)),
            workers: Vec::new(),
            limit: limit.get(),
            state: Arc::new(PoolState::default()),
        }
    }

    /// Number of threads started so far
    #[cfg(test)]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a job, starting a thread if every running one may be busy.
    ///
    /// Returns `Ok(false)` if the pool no longer accepts work, and
    /// `Err(WorkerSpawn)` only when not a single thread could be started.
    pub fn submit<F>(&mut self, job: F) -> Result<bool, TallyError>
    where
        F: FnOnce() + Send + 'static,
    {
        let Some(sender) = &self.sender else {
            return Ok(false);
        };

        let pending = {
            let mut pending = self.state.lock_pending();
            *pending += 1;
            *pending
        };
        if sender.send(Box::new(job)).is_err() {
            // Every worker is gone; undo the reservation
            drop(PendingGuard(&self.state));
            return Ok(false);
        }

        if pending > self.workers.len() && self.workers.len() < self.limit {
            self.spawn_worker()?;
        }
        Ok(true)
    }

    fn spawn_worker(&mut self) -> Result<(), TallyError> {
        let id = self.workers.len();
        let receiver = Arc::clone(&self.receiver);
        let state = Arc::clone(&self.state);
        let spawned = thread::Builder::new()
            .name(format!("tally-worker-{}", id))
            .spawn(move || worker_loop(id, receiver, state));

        match spawned {
            Ok(handle) => {
                self.workers.push(handle);
                Ok(())
            }
            Err(e) if self.workers.is_empty() => Err(TallyError::WorkerSpawn(e)),
            Err(e) => {
                log::warn!(
                    "could not start worker thread {}: {}; continuing with {}",
                    id,
                    e,
                    id
                );
                self.limit = id;
                Ok(())
            }
        }
    }

    /// Stop accepting jobs, then wait for the queue to drain or `timeout` to pass.
    ///
    /// Never returns before one of those two conditions holds.
    pub fn await_termination(mut self, timeout: Duration) -> Termination {
        self.sender.take();

        let started = Instant::now();
        let remaining = {
            let pending = self.state.lock_pending();
            let (pending, _) = self
                .state
                .drained
                .wait_timeout_while(pending, timeout, |pending| *pending > 0)
                .unwrap_or_else(PoisonError::into_inner);
            *pending
        };

        if remaining == 0 {
            let threads = self.workers.len();
            for handle in self.workers.drain(..) {
                if handle.join().is_err() {
                    log::error!("worker thread exited abnormally");
                }
            }
            log::debug!(
                "worker pool drained in {}ms on {} thread(s)",
                started.elapsed().as_millis(),
                threads
            );
            Termination::Drained
        } else {
            self.cancel();
            Termination::TimedOut {
                abandoned: remaining,
            }
        }
    }

    /// Cancel immediately: queued jobs are dropped unrun and workers detached
    pub fn shutdown_now(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        self.state.cancelled.store(true, Ordering::Release);
        self.sender.take();
        // Detached threads exit on their own once the queue is empty
        let detached = self.workers.drain(..).count();
        log::debug!("worker pool cancelled, {} thread(s) detached", detached);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.sender.is_some() {
            self.cancel();
        }
    }
}

fn worker_loop(id: usize, receiver: Arc<Mutex<Receiver<Job>>>, state: Arc<PoolState>) {
    loop {
        // The queue lock is released before the job runs
        let job = receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(job) = job else {
            break;
        };

        let _guard = PendingGuard(&state);
        if state.cancelled.load(Ordering::Acquire) {
            continue;
        }
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            log::error!("tally-worker-{}: job panicked, its line was not counted", id);
        }
    }
}
