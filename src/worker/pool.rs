//! Worker pool management.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};
use tracing::{debug, info};

use crate::matcher::Pattern;
use crate::protocol::{Message, Request};

use super::cpu::{CpuWorker, WorkerEvent};
use super::session::{SearchSession, DEFAULT_PROGRESS_INTERVAL};
use super::{CancelToken, SearchError};

/// Events the workers may queue before they block.
pub const EVENT_QUEUE_CAPACITY: usize = 100;

/// How a pool runs its sessions.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Number of independent sessions, one per thread
    pub workers: usize,
    /// Minimum interval between progress reports from each session
    pub progress_interval: Duration,
    /// Restart sessions after a match instead of stopping the worker
    pub continuous: bool,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            workers: 1,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            continuous: false,
        }
    }
}

/// Runs independent search sessions in parallel and merges their messages.
///
/// Sessions share nothing but the cancellation flag; attempts and rates are
/// aggregated here, on the receiving side.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// The pattern being searched for
    pattern: Pattern,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for worker events
    events: Receiver<WorkerEvent>,
    /// Shared cancellation flag
    cancel: CancelToken,
    /// Attempts of each worker's current session
    session_attempts: Vec<u64>,
    /// Last reported rate of each worker
    rates: Vec<u64>,
    /// Attempts of sessions that already ended in a match
    finished_attempts: u64,
    /// Matches delivered so far
    matches: u64,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Validates the request and spawns the workers.
    ///
    /// Invalid patterns and settings are rejected here, before any work starts.
    pub fn spawn(request: &Request, options: PoolOptions) -> Result<Self, SearchError> {
        if options.workers == 0 {
            return Err(SearchError::NoWorkers);
        }
        let template = SearchSession::new(request, options.progress_interval)?;
        let pattern = template.pattern().clone();

        let (events_tx, events) = bounded(EVENT_QUEUE_CAPACITY);
        let cancel = CancelToken::new();
        let mut handles = Vec::with_capacity(options.workers);

        for id in 0..options.workers {
            let session = SearchSession::new(request, options.progress_interval)?;
            let worker = CpuWorker::new(
                id,
                session,
                events_tx.clone(),
                cancel.clone(),
                options.continuous,
            );
            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    cancel.cancel();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(SearchError::Spawn(e));
                }
            }
        }

        debug!(
            workers = options.workers,
            difficulty = pattern.estimated_difficulty(),
            "worker pool started"
        );

        Ok(Self {
            num_workers: options.workers,
            pattern,
            handles: Some(handles),
            events,
            cancel,
            session_attempts: vec![0; options.workers],
            rates: vec![0; options.workers],
            finished_attempts: 0,
            matches: 0,
            start_time: Instant::now(),
        })
    }

    /// Waits for the next message, up to `timeout`.
    ///
    /// Progress messages carry totals across all workers. Returns `None` on
    /// timeout, once every worker has exited, or after cancellation; no
    /// `found` message is ever returned after [`cancel`](Self::cancel).
    pub fn wait_for_message(&mut self, timeout: Duration) -> Option<Message> {
        if self.is_cancelled() {
            return None;
        }
        let event = self.events.recv_timeout(timeout).ok()?;
        if self.is_cancelled() {
            return None;
        }
        Some(self.absorb(event))
    }

    /// Returns the next already-queued message without blocking.
    pub fn try_next(&mut self) -> Option<Message> {
        if self.is_cancelled() {
            return None;
        }
        let event = self.events.try_recv().ok()?;
        Some(self.absorb(event))
    }

    fn absorb(&mut self, event: WorkerEvent) -> Message {
        let id = event.worker_id;
        match event.message {
            Message::Progress { attempts, rate } => {
                self.session_attempts[id] = attempts;
                self.rates[id] = rate;
                Message::Progress {
                    attempts: self.total_attempts(),
                    rate: self.rates.iter().sum(),
                }
            }
            Message::Found { result } => {
                self.finished_attempts += result.attempts;
                self.session_attempts[id] = 0;
                self.matches += 1;
                info!(
                    worker = id,
                    address = %result.address,
                    attempts = result.attempts,
                    "match found"
                );
                Message::Found { result }
            }
        }
    }

    /// Returns the number of events waiting to be read.
    pub fn queued(&self) -> usize {
        self.events.len()
    }

    /// Signals all workers to stop at their next batch boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a clone of the cancellation flag (e.g. for signal handlers).
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels and waits for all workers to exit.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns true once every worker thread has exited.
    pub fn workers_finished(&self) -> bool {
        self.handles
            .as_ref()
            .map_or(true, |handles| handles.iter().all(|h| h.is_finished()))
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the pattern being searched for.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns attempts reported so far across all sessions.
    pub fn total_attempts(&self) -> u64 {
        self.finished_attempts + self.session_attempts.iter().sum::<u64>()
    }

    /// Returns the number of matches delivered.
    pub fn total_matches(&self) -> u64 {
        self.matches
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the average rate since the pool was created.
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
