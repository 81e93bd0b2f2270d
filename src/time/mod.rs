//! Search deadlines: an optional wall-clock limit plus a shared stop flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Deadline {
    at: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl Deadline {
    /// Never expires unless stopped.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn after(limit: Duration) -> Self {
        Self {
            at: Some(Instant::now() + limit),
            stop: Arc::default(),
        }
    }

    /// Restarts the clock from now, keeping the stop flag. A zero limit means
    /// no time limit.
    pub fn start(&mut self, time_limit_ms: u64) {
        self.at = if time_limit_ms == 0 {
            None
        } else {
            Some(Instant::now() + Duration::from_millis(time_limit_ms))
        };
    }

    /// Handle other threads use to cancel the search.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn expired(&self) -> bool {
        self.is_stopped() || self.at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }
}
