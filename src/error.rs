//! Error types for keylock.
//!
//! Uses thiserror for derive macros. `LockError` is what callers of the lock
//! protocol and the CLI see; `StoreError` is what a store backend reports for a
//! single failed round-trip.

use crate::exit_codes;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Why an acquisition attempt gave up without claiming the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireFailure {
    /// The timeout budget elapsed.
    TimedOut(Duration),
    /// The cancel signal fired first.
    Cancelled,
}

impl fmt::Display for AcquireFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireFailure::TimedOut(timeout) => {
                write!(f, "timed out after {}ms", timeout.as_millis())
            }
            AcquireFailure::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Main error type for keylock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Lock options or the config file are invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The key could not be claimed before the timeout or cancellation.
    ///
    /// This is a cancellation-style failure: the caller never owned the
    /// critical section.
    #[error("failed to acquire distributed lock for key '{key}' ({cause})")]
    AcquisitionFailed { key: String, cause: AcquireFailure },

    /// The store failed while returning a held key.
    #[error("failed to release lock for key '{key}': {source}")]
    Release {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The store failed outside the acquisition loop.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The invocation needs correcting (e.g. a missing `--force`).
    #[error("{0}")]
    UserError(String),

    /// A command run under the lock could not be started.
    #[error("{0}")]
    Command(String),
}

impl LockError {
    /// Returns the CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::Configuration(_) => exit_codes::USER_ERROR,
            LockError::UserError(_) => exit_codes::USER_ERROR,
            LockError::Command(_) => exit_codes::USER_ERROR,
            LockError::Release { .. } => exit_codes::STORE_FAILURE,
            LockError::Store(_) => exit_codes::STORE_FAILURE,
            LockError::AcquisitionFailed { .. } => exit_codes::LOCK_FAILURE,
        }
    }

    /// Whether this error means "the operation was cancelled or timed out".
    pub fn is_cancellation(&self) -> bool {
        matches!(self, LockError::AcquisitionFailed { .. })
    }
}

/// A failure reported by a store backend for one round-trip.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure in a file-backed store.
    #[error("store I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A claim record could not be encoded or decoded.
    #[error("malformed claim record: {0}")]
    Record(#[from] serde_json::Error),

    /// Redis transport or script failure.
    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Any other backend failure.
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for keylock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_has_correct_exit_code() {
        let err = LockError::Configuration("timeout must be greater than zero".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(!err.is_cancellation());
    }

    #[test]
    fn acquisition_failed_is_cancellation_and_names_key() {
        let err = LockError::AcquisitionFailed {
            key: "Test".to_string(),
            cause: AcquireFailure::TimedOut(Duration::from_millis(10)),
        };
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
        assert!(err.is_cancellation());
        assert_eq!(
            err.to_string(),
            "failed to acquire distributed lock for key 'Test' (timed out after 10ms)"
        );
    }

    #[test]
    fn cancelled_cause_is_descriptive() {
        let err = LockError::AcquisitionFailed {
            key: "jobs".to_string(),
            cause: AcquireFailure::Cancelled,
        };
        assert!(err.to_string().ends_with("(cancelled)"));
    }

    #[test]
    fn release_error_keeps_store_source() {
        let err = LockError::Release {
            key: "jobs".to_string(),
            source: StoreError::Backend("connection reset".to_string()),
        };
        assert_eq!(err.exit_code(), exit_codes::STORE_FAILURE);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn store_error_converts_transparently() {
        let err: LockError = StoreError::Backend("down".to_string()).into();
        assert_eq!(err.exit_code(), exit_codes::STORE_FAILURE);
        assert_eq!(err.to_string(), "down");
    }
}
