//! Public entry point for key-scoped locking.

use super::handle::LockHandle;
use super::options::LockOptions;
use crate::cancel::CancelSignal;
use crate::error::{AcquireFailure, LockError, Result};
use crate::key::LockKey;
use tracing::info;

/// Hands out [`LockHandle`]s for keys, coordinated through the options' store.
///
/// Unlike an in-process mutex, `acquire` can fail: when the key is not claimed
/// within the timeout, or the cancel signal fires first, it returns
/// [`LockError::AcquisitionFailed`] instead of a handle.
#[derive(Debug, Clone)]
pub struct LockProvider {
    options: LockOptions,
}

impl LockProvider {
    pub fn new(options: LockOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LockOptions {
        &self.options
    }

    /// Claim `key`, waiting up to the configured timeout.
    ///
    /// # Returns
    ///
    /// * `Ok(LockHandle)` - The key is claimed; the handle releases it
    /// * `Err(LockError::AcquisitionFailed)` - Timed out or cancelled; nothing is held
    pub fn acquire(&self, key: &str, cancel: &CancelSignal) -> Result<LockHandle> {
        let key = LockKey::new(key);
        let store = self.options.store();

        let claimed = store.acquire(
            key.store_key(),
            self.options.timeout(),
            self.options.retry_delay(),
            self.options.exception_sink(),
            cancel,
        );

        if !claimed {
            let cause = if cancel.is_cancelled() {
                AcquireFailure::Cancelled
            } else {
                AcquireFailure::TimedOut(self.options.timeout())
            };
            return Err(LockError::AcquisitionFailed {
                key: key.name().to_string(),
                cause,
            });
        }

        info!(key = %key, "lock acquired");
        Ok(LockHandle::new(key, store.clone()))
    }

    /// Run `f` while holding `key`.
    ///
    /// The lock is released after `f` returns; a failed release is reported as
    /// [`LockError::Release`] even though `f` ran.
    pub fn with_lock<T>(
        &self,
        key: &str,
        cancel: &CancelSignal,
        f: impl FnOnce() -> T,
    ) -> Result<T> {
        let handle = self.acquire(key, cancel)?;
        let value = f();
        handle.release()?;
        Ok(value)
    }
}
