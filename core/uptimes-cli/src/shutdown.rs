//! Stop request for `uptimes watch`.
//!
//! The Ctrl-C handler calls [`StopSignal::request_stop`] from its own thread.
//! The watch loop sleeps between polls with [`StopSignal::sleep`], which
//! returns early once a stop is requested so the final save is not delayed
//! by a long auto-save interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Why [`StopSignal::sleep`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Elapsed,
    Stopped,
}

pub struct StopSignal {
    stopped: AtomicBool,
    wakeup: Condvar,
    lock: Mutex<()>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            stopped: AtomicBool::new(false),
            wakeup: Condvar::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        // Taking the lock orders this notify after a sleeper's flag check.
        let _held = self.lock.lock();
        self.wakeup.notify_all();
    }

    pub fn stop_requested(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleeps for `step`, or less if a stop arrives meanwhile.
    pub fn sleep(&self, step: Duration) -> Wake {
        if self.stop_requested() {
            return Wake::Stopped;
        }
        let Ok(held) = self.lock.lock() else {
            return Wake::Stopped;
        };
        match self
            .wakeup
            .wait_timeout_while(held, step, |_| !self.stop_requested())
        {
            Ok((_, waited)) if waited.timed_out() => Wake::Elapsed,
            // Woken by a stop, or the lock was poisoned by a panicking thread.
            _ => Wake::Stopped,
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
