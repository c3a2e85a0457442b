//! Cooperative cancellation for blocking lock acquisition.
//!
//! A `CancelSignal` is a cloneable flag shared between the thread waiting for
//! a lock and whoever may want to stop that wait. Besides being polled, it can
//! be slept on: `wait_timeout` returns as soon as the signal fires instead of
//! finishing the full delay.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wakeup: Condvar,
}

/// Cancellation flag with an interruptible timed wait.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    /// Create a signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every thread waiting on it.
    ///
    /// Firing twice is harmless.
    pub fn cancel(&self) {
        let mut cancelled = self.lock();
        *cancelled = true;
        self.inner.wakeup.notify_all();
    }

    /// Whether the signal has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Sleep for `timeout` unless the signal fires first.
    ///
    /// Returns `true` if the signal fired (before or during the wait).
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.lock();

        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .inner
                .wakeup
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(|poison| poison.into_inner());
            cancelled = guard;
        }

        true
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool, so a poisoned mutex still holds a valid value.
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
