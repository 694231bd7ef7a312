//! Progress reporting and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, checked once per situation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives progress of the sampling loop.
pub trait ProgressSink: Send + Sync {
    /// Called before each situation is processed.
    fn situation_started(&self, _situation: usize, _total: usize) {}

    /// Percentage of situations processed, reported every fourth situation.
    fn progress(&self, percent: u32);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&self, _percent: u32) {}
}

/// Logs progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn situation_started(&self, situation: usize, total: usize) {
        tracing::debug!(situation, total, "Processing meteo situation");
    }

    fn progress(&self, percent: u32) {
        tracing::info!(percent, "Sampling progress");
    }
}
