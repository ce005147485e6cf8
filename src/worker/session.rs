//! Search session state machine.
//!
//! A session is advanced one batch at a time by [`SearchSession::drive_batch`];
//! the host (a worker thread, a test, an async task) owns the loop, checks
//! for cancellation between batches and forwards the messages it gets back.

use std::time::{Duration, Instant};

use rand::{CryptoRng, RngCore};
use tracing::debug;

use crate::crypto::Keypair;
use crate::matcher::Pattern;
use crate::protocol::{Message, Request, VanityResult};

use super::SearchError;

/// Default minimum interval between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(1000);

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Found,
    Cancelled,
}

/// What a single batch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// No match yet; carries a progress message when one was due.
    Pending(Option<Message>),
    /// A match; the session is now [`SessionState::Found`].
    Found(VanityResult),
    /// The session was not running, nothing was attempted.
    Stopped(SessionState),
}

/// One brute-force search over random private keys.
#[derive(Debug)]
pub struct SearchSession {
    pattern: Pattern,
    batch_size: usize,
    progress_interval: Duration,
    state: SessionState,
    attempts: u64,
    started_at: Instant,
    last_report_at: Instant,
    attempts_at_last_report: u64,
}

impl SearchSession {
    /// Validates a request and creates an idle session.
    pub fn new(request: &Request, progress_interval: Duration) -> Result<Self, SearchError> {
        if request.batch_size == 0 {
            return Err(SearchError::InvalidBatchSize);
        }
        let pattern = request.pattern()?;
        let now = Instant::now();

        Ok(Self {
            pattern,
            batch_size: request.batch_size,
            progress_interval,
            state: SessionState::Idle,
            attempts: 0,
            started_at: now,
            last_report_at: now,
            attempts_at_last_report: 0,
        })
    }

    /// Enters `Running`, from `Idle` or as a restart after `Found`/`Cancelled`.
    pub fn start(&mut self) -> Result<(), SearchError> {
        if self.state == SessionState::Running {
            return Err(SearchError::AlreadyRunning);
        }
        let now = Instant::now();
        self.state = SessionState::Running;
        self.attempts = 0;
        self.attempts_at_last_report = 0;
        self.started_at = now;
        self.last_report_at = now;
        debug!(
            prefix = self.pattern.prefix(),
            suffix = self.pattern.suffix(),
            batch_size = self.batch_size,
            "search session started"
        );
        Ok(())
    }

    /// Stops a running session without a result. Returns false if it was not running.
    pub fn cancel(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Cancelled;
        debug!(attempts = self.attempts, "search session cancelled");
        true
    }

    /// Discards a match that arrived together with a cancellation request.
    ///
    /// Moves a `Found` session to `Cancelled`; returns false in any other state.
    pub fn discard_result(&mut self) -> bool {
        if self.state != SessionState::Found {
            return false;
        }
        self.state = SessionState::Cancelled;
        debug!(attempts = self.attempts, "search session cancelled after a match");
        true
    }

    /// Runs up to one batch of attempts.
    ///
    /// Returns as soon as a key matches. Otherwise, after the full batch, a
    /// progress message is included if the report interval has elapsed.
    pub fn drive_batch<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> BatchOutcome {
        if self.state != SessionState::Running {
            return BatchOutcome::Stopped(self.state);
        }

        for _ in 0..self.batch_size {
            let keypair = Keypair::generate(rng);
            self.attempts += 1;

            if self.pattern.matches(keypair.address()) {
                self.state = SessionState::Found;
                let elapsed = self.started_at.elapsed();
                debug!(attempts = self.attempts, ?elapsed, "search session found a match");
                return BatchOutcome::Found(VanityResult {
                    address: keypair.address().to_hex_prefixed(),
                    private_key: keypair.private_key_hex(),
                    attempts: self.attempts,
                    time: format_elapsed(elapsed),
                });
            }
        }

        BatchOutcome::Pending(self.progress_if_due(Instant::now()))
    }

    fn progress_if_due(&mut self, now: Instant) -> Option<Message> {
        let since = now.saturating_duration_since(self.last_report_at);
        if since < self.progress_interval {
            return None;
        }
        let delta = self.attempts - self.attempts_at_last_report;
        let rate = rate_per_second(delta, since);
        self.last_report_at = now;
        self.attempts_at_last_report = self.attempts;
        Some(Message::Progress {
            attempts: self.attempts,
            rate,
        })
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns attempts made since the last start.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Returns the validated pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// Rounded attempts per second; zero when no time has passed.
pub fn rate_per_second(attempts: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        (attempts as f64 / secs).round() as u64
    } else {
        0
    }
}

/// Formats an elapsed time as `842ms` below one second and `3.2s` above.
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
