//! Cooperative shutdown signal.
//!
//! The binary's signal handler raises the flag; the control loop checks it
//! between blocking calls.  A raised flag never interrupts a call already
//! in progress.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle on a shared "stop requested" flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this signal to stop.  Lock-free; safe to call
    /// from a signal-handler thread.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}
