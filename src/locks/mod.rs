//! Key-scoped locking over a shared store.
//!
//! # Protocol
//!
//! - [`LockProvider::acquire`] namespaces the caller key (`LOCK_` prefix) and
//!   runs a [`LockAttempt`] against the store: claim, wait `retry_delay`, claim
//!   again, until the claim succeeds, `timeout` elapses, or the cancel signal
//!   fires.
//! - Store errors during the attempt are retried. They reach the caller only
//!   through the optional exception sink and the log.
//! - Success yields a [`LockHandle`]; failure yields
//!   [`LockError::AcquisitionFailed`](crate::error::LockError::AcquisitionFailed).
//!   A handle always means the key is held.
//!
//! # RAII Handles
//!
//! A handle returns its key to the store exactly once, whether released
//! explicitly, concurrently from several threads, or by being dropped. If the
//! release fails during drop, a warning is logged but the program does not
//! crash.
//!
//! There is no in-process mutex on top of the store: two threads racing for a
//! key behave exactly like two processes.

mod attempt;
mod handle;
mod options;
mod provider;


// Re-export public API
pub use attempt::LockAttempt;
pub use handle::LockHandle;
pub use options::LockOptions;
pub use provider::LockProvider;
