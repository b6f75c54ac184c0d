//! Key requests raised between ticks

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Requests consumed by one logic tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSignals {
    pub split: bool,
    pub unsplit: bool,
    pub stop: bool,
}

/// Cloneable handle a key listener uses to raise requests.
///
/// Each flag stays raised until the next logic tick consumes it.
#[derive(Debug, Clone, Default)]
pub struct InputHandle {
    split: Arc<AtomicBool>,
    unsplit: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl InputHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete the next manual split
    pub fn request_split(&self) {
        self.split.store(true, Ordering::SeqCst);
    }

    /// Undo the latest manual split
    pub fn request_unsplit(&self) {
        self.unsplit.store(true, Ordering::SeqCst);
    }

    /// Stop the timer
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Read and clear all requests
    pub fn take(&self) -> InputSignals {
        InputSignals {
            split: self.split.swap(false, Ordering::SeqCst),
            unsplit: self.unsplit.swap(false, Ordering::SeqCst),
            stop: self.stop.swap(false, Ordering::SeqCst),
        }
    }
}
