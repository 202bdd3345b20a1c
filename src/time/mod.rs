//! Wall-clock budget and cooperative stop flag for one search

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Deadline of a running search plus the shared stop flag.
///
/// The flag can be raised from another thread through `stop_handle`; the
/// search itself raises it when the budget runs out.
#[derive(Debug, Clone)]
pub struct SearchClock {
    start: Instant,
    budget: Option<Duration>,
    stop: Arc<AtomicBool>,
}

impl SearchClock {
    pub fn new(budget: Option<Duration>, stop: Arc<AtomicBool>) -> Self {
        Self {
            start: Instant::now(),
            budget,
            stop,
        }
    }

    /// Clock without a deadline, only stoppable through its flag.
    pub fn unlimited() -> Self {
        Self::new(None, Arc::new(AtomicBool::new(false)))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// True once the budget (if any) has been used up.
    pub fn expired(&self) -> bool {
        self.budget.is_some_and(|b| self.start.elapsed() >= b)
    }

    /// Raise the stop flag if the budget ran out, then report the flag.
    pub fn poll(&self) -> bool {
        if self.expired() {
            self.stop.store(true, Ordering::Relaxed);
        }
        self.is_stopped()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Lower the stop flag for the next search.
    pub fn clear_stop(&self) {
        self.stop.store(false, Ordering::Relaxed);
    }
}
