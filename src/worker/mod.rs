//! Search execution.
//!
//! This module provides:
//! - The per-session state machine ([`SearchSession`])
//! - A thread-backed worker that drives one session at a time
//! - A pool running independent sessions in parallel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::matcher::PatternError;

mod cpu;
mod pool;
mod session;

pub use cpu::{CpuWorker, WorkerEvent};
pub use pool::{PoolOptions, WorkerPool, EVENT_QUEUE_CAPACITY};
pub use session::{
    format_elapsed, rate_per_second, BatchOutcome, SearchSession, SessionState,
    DEFAULT_PROGRESS_INTERVAL,
};

/// Errors raised before or while starting a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Session is already running")]
    AlreadyRunning,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Cooperative cancellation flag shared between a caller and its workers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates an untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Workers observe it at their next batch boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
