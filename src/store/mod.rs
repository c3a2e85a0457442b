//! Shared-store capability consumed by the lock protocol.
//!
//! A store only has to provide two round-trips:
//! - `try_acquire`: one atomic "set if absent, with expiry" against a key
//! - `release`: immediate expiry of a key, without checking who set it
//!
//! The polling loop that turns a single claim into a bounded wait lives in
//! [`LockAttempt`](crate::locks::LockAttempt) and is exposed here as the
//! provided [`StoreConnection::acquire`] method. A backend whose store can
//! wait server-side may override it, as long as it keeps the same contract.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map, for in-process coordination and tests
//! - [`FileStore`]: a directory of exclusively-created lock files
//! - `RedisStore` (feature `redis`): a server-side claim script

mod file;
mod memory;
mod record;
#[cfg(feature = "redis")]
mod redis;

use crate::cancel::CancelSignal;
use crate::error::StoreError;
use crate::locks::LockAttempt;
use std::time::Duration;

pub use file::{FileClaim, FileStore};
pub use memory::MemoryStore;
pub use record::{ClaimRecord, owner_string};
#[cfg(feature = "redis")]
pub use self::redis::RedisStore;

/// Observer for store failures that happen while polling for a lock.
///
/// A sink is purely observational: it is told about each failed round-trip
/// exactly once and has no way to change what the acquisition loop does next.
pub trait ExceptionSink: Send + Sync {
    fn notify(&self, error: &StoreError);
}

impl<F> ExceptionSink for F
where
    F: Fn(&StoreError) + Send + Sync,
{
    fn notify(&self, error: &StoreError) {
        self(error)
    }
}

/// Connection to a store offering an atomic claim-with-expiry primitive.
pub trait StoreConnection: Send + Sync {
    /// Perform one atomic claim of `key`.
    ///
    /// Returns `Ok(true)` if this call set the key, `Ok(false)` if it was
    /// already held. The claim expires on its own after `ttl`.
    fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Expire `key` immediately.
    ///
    /// Must succeed when the key is already gone or was set by someone else.
    fn release(&self, key: &str) -> Result<(), StoreError>;

    /// Poll `try_acquire` until it succeeds, `timeout` elapses, or `cancel`
    /// fires, waiting `retry_delay` between polls.
    ///
    /// Store failures are reported to `sink` and retried. Returns whether the
    /// key was claimed.
    fn acquire(
        &self,
        key: &str,
        timeout: Duration,
        retry_delay: Duration,
        sink: Option<&dyn ExceptionSink>,
        cancel: &CancelSignal,
    ) -> bool {
        LockAttempt::new(key, timeout, retry_delay, sink).run(self, cancel)
    }
}
