//! CPU-based worker that drives search sessions on its own thread.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};
use tracing::{debug, warn};

use crate::protocol::Message;

use super::session::{BatchOutcome, SearchSession};
use super::CancelToken;

/// How long a blocked send waits before re-checking the cancellation flag.
const SEND_RETRY_INTERVAL: Duration = Duration::from_millis(20);

/// A message tagged with the worker that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEvent {
    pub worker_id: usize,
    pub message: Message,
}

/// A worker that runs one session, or restarts it after each match.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// The session being driven
    session: SearchSession,
    /// Channel to send progress and results
    events: Sender<WorkerEvent>,
    /// Shared cancellation flag
    cancel: CancelToken,
    /// Restart the session after a match instead of exiting
    continuous: bool,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        session: SearchSession,
        events: Sender<WorkerEvent>,
        cancel: CancelToken,
        continuous: bool,
    ) -> Self {
        Self {
            id,
            session,
            events,
            cancel,
            continuous,
        }
    }

    /// Runs the worker loop.
    ///
    /// Drives the session batch by batch until:
    /// - A match is found (and the worker is not continuous)
    /// - Cancellation is requested
    /// - The receiving side of the channel is gone
    pub fn run(mut self) {
        let mut rng = rand::thread_rng();

        if let Err(e) = self.session.start() {
            warn!(worker = self.id, error = %e, "worker could not start its session");
            return;
        }

        loop {
            if self.cancel.is_cancelled() {
                self.session.cancel();
                break;
            }

            let message = match self.session.drive_batch(&mut rng) {
                BatchOutcome::Pending(None) => None,
                BatchOutcome::Pending(Some(progress)) => Some(progress),
                BatchOutcome::Found(result) => {
                    // A match from the batch in flight when cancel arrived is dropped.
                    if self.cancel.is_cancelled() {
                        self.session.discard_result();
                        break;
                    }
                    Some(Message::Found { result })
                }
                BatchOutcome::Stopped(state) => {
                    debug!(worker = self.id, ?state, "session stopped");
                    break;
                }
            };

            if let Some(message) = message {
                let found = matches!(message, Message::Found { .. });
                let event = WorkerEvent {
                    worker_id: self.id,
                    message,
                };
                if !self.deliver(event) {
                    if found {
                        self.session.discard_result();
                    } else {
                        self.session.cancel();
                    }
                    break;
                }
                if found {
                    if !self.continuous {
                        break;
                    }
                    if self.session.start().is_err() {
                        break;
                    }
                }
            }

            thread::yield_now();
        }

        debug!(worker = self.id, attempts = self.session.attempts(), "worker exiting");
    }

    /// Sends an event, waiting while the queue is full.
    ///
    /// Returns false if the receiver is gone or cancellation was requested
    /// while waiting.
    fn deliver(&self, mut event: WorkerEvent) -> bool {
        loop {
            match self.events.send_timeout(event, SEND_RETRY_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if self.cancel.is_cancelled() {
                        return false;
                    }
                    event = pending;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Request;
    use crate::worker::DEFAULT_PROGRESS_INTERVAL;
    use crossbeam_channel::{bounded, unbounded, Receiver};
    use std::time::Instant;

    fn worker(
        prefix: &str,
        cancel: CancelToken,
        continuous: bool,
    ) -> (CpuWorker, Receiver<WorkerEvent>) {
        let (tx, rx) = unbounded();
        let request = Request::new(prefix, "", false);
        let session = SearchSession::new(&request, DEFAULT_PROGRESS_INTERVAL).unwrap();
        (CpuWorker::new(3, session, tx, cancel, continuous), rx)
    }

    #[test]
    fn test_single_shot_worker_reports_once() {
        let (worker, rx) = worker("", CancelToken::new(), false);
        assert_eq!(worker.id(), 3);
        worker.run();

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].worker_id, 3);
        assert_eq!(events[0].message.as_found().map(|r| r.attempts), Some(1));
    }

    #[test]
    fn test_cancelled_worker_sends_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let (worker, rx) = worker("", cancel, false);
        worker.run();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_continuous_worker_stops_when_receiver_dropped() {
        let (worker, rx) = worker("", CancelToken::new(), true);
        let handle = thread::spawn(move || worker.run());
        let first = rx.recv().unwrap();
        assert!(first.message.as_found().is_some());
        drop(rx);
        handle.join().unwrap();
    }

    #[test]
    fn test_blocked_worker_exits_on_cancel() {
        let (tx, rx) = bounded(1);
        let cancel = CancelToken::new();
        let session =
            SearchSession::new(&Request::default(), DEFAULT_PROGRESS_INTERVAL).unwrap();
        let worker = CpuWorker::new(0, session, tx, cancel.clone(), true);
        let handle = thread::spawn(move || worker.run());

        // Nobody reads: the queue fills after one match and the worker blocks.
        let deadline = Instant::now() + Duration::from_secs(30);
        while !rx.is_full() {
            assert!(Instant::now() < deadline, "queue never filled");
            thread::sleep(Duration::from_millis(5));
        }
        thread::sleep(Duration::from_millis(50));
        assert_eq!(rx.len(), 1);

        cancel.cancel();
        handle.join().unwrap();
        assert_eq!(rx.len(), 1);
    }
}
