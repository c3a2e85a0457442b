//! RAII handle for a claimed key.

use crate::error::{LockError, Result};
use crate::key::LockKey;
use crate::store::StoreConnection;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Proof of a successful claim.
///
/// Holding a `LockHandle` means owning the critical section for its key. The
/// key is returned to the store at most once: by the first call to
/// [`release`](Self::release) from any thread, or on drop if nobody released it.
/// Later and concurrent releases are no-ops and never block.
pub struct LockHandle {
    key: LockKey,
    store: Arc<dyn StoreConnection>,
    held: AtomicBool,
}

impl LockHandle {
    /// Wrap a claim that has already succeeded.
    pub(super) fn new(key: LockKey, store: Arc<dyn StoreConnection>) -> Self {
        Self {
            key,
            store,
            held: AtomicBool::new(true),
        }
    }

    /// The caller key this handle holds.
    pub fn key(&self) -> &LockKey {
        &self.key
    }

    /// Whether the claim has not been released through this handle yet.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Return the key to the store.
    ///
    /// Only the caller that flips the handle from held to released talks to
    /// the store; everyone else returns `Ok(())` immediately. A store failure
    /// is returned to that one caller, and the handle stays released (the
    /// store's expiry will reclaim the key).
    pub fn release(&self) -> Result<()> {
        if !self.held.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        self.store
            .release(self.key.store_key())
            .map_err(|source| LockError::Release {
                key: self.key.name().to_string(),
                source,
            })?;

        info!(key = %self.key, "lock released");
        Ok(())
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(key = %self.key, error = %e, "failed to release lock on drop");
        }
    }
}

impl fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("key", &self.key)
            .field("held", &self.is_held())
            .finish_non_exhaustive()
    }
}
