//! keylock: key-scoped mutual exclusion coordinated through a shared store.
//!
//! Independent processes or threads that share a store (a Redis server, a
//! directory, or an in-process map) agree that only one of them runs the
//! critical section for a given key at a time.
//!
//! ```no_run
//! use keylock::{CancelSignal, FileStore, LockOptions, LockProvider};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(FileStore::new("/tmp/keylock"));
//! let options = LockOptions::new(store, Duration::from_secs(10), Duration::from_millis(100))?;
//! let provider = LockProvider::new(options);
//!
//! let handle = provider.acquire("nightly-report", &CancelSignal::new())?;
//! // ... critical section ...
//! handle.release()?;
//! # Ok::<(), keylock::LockError>(())
//! ```

pub mod cancel;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod key;
pub mod locks;
pub mod store;

#[cfg(test)]
mod test_support;

pub use cancel::CancelSignal;
pub use error::{AcquireFailure, LockError, Result, StoreError};
pub use key::LockKey;
pub use locks::{LockAttempt, LockHandle, LockOptions, LockProvider};
pub use store::{ExceptionSink, FileStore, MemoryStore, StoreConnection};
