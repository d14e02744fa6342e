//! Two-phase wall-clock budget for a script run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Budget shared by the engine's interrupt hook and the event loop.
///
/// Until [`Deadline::begin_await`] the tighter synchronous bound applies;
/// afterwards the outer bound does. Both are measured from construction, so
/// the outer bound is never renewed by progress.
#[derive(Debug, Clone)]
pub struct Deadline {
    start: Instant,
    sync_limit: Duration,
    outer_limit: Duration,
    awaiting: Arc<AtomicBool>,
    tripped: Arc<AtomicBool>,
}

impl Deadline {
    pub fn new(sync_limit: Duration, outer_limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            sync_limit,
            outer_limit: outer_limit.max(sync_limit),
            awaiting: Arc::new(AtomicBool::new(false)),
            tripped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Switch to the outer bound.
    pub fn begin_await(&self) {
        self.awaiting.store(true, Ordering::SeqCst);
    }

    /// Whether the current bound has passed. Latches once true.
    pub fn expired(&self) -> bool {
        if self.tripped() {
            return true;
        }
        let limit = if self.awaiting.load(Ordering::SeqCst) {
            self.outer_limit
        } else {
            self.sync_limit
        };
        let expired = self.start.elapsed() >= limit;
        if expired {
            self.tripped.store(true, Ordering::SeqCst);
        }
        expired
    }

    /// Whether [`Deadline::expired`] has ever returned true.
    pub fn tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    /// Time left before the outer bound.
    pub fn remaining(&self) -> Duration {
        self.outer_limit.saturating_sub(self.start.elapsed())
    }

    /// Milliseconds since construction, for the script clock.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn outer_limit(&self) -> Duration {
        self.outer_limit
    }
}
