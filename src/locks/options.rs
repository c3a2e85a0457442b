//! Validated lock options.

use crate::error::{LockError, Result};
use crate::store::{ExceptionSink, StoreConnection};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Options shared by every lock handed out by one [`LockProvider`](super::LockProvider).
///
/// Validated once, at construction; nothing re-checks them later.
#[derive(Clone)]
pub struct LockOptions {
    store: Arc<dyn StoreConnection>,
    timeout: Duration,
    retry_delay: Duration,
    exception_sink: Option<Arc<dyn ExceptionSink>>,
}

impl LockOptions {
    /// Build options for `store`.
    ///
    /// # Arguments
    ///
    /// * `timeout` - How long to keep trying to claim a key; also the claim's expiry
    /// * `retry_delay` - Wait between failed claims
    ///
    /// # Returns
    ///
    /// * `Err(LockError::Configuration)` - `timeout` or `retry_delay` is zero
    pub fn new(
        store: Arc<dyn StoreConnection>,
        timeout: Duration,
        retry_delay: Duration,
    ) -> Result<Self> {
        if timeout.is_zero() {
            return Err(LockError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if retry_delay.is_zero() {
            return Err(LockError::Configuration(
                "retry_delay must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            store,
            timeout,
            retry_delay,
            exception_sink: None,
        })
    }

    /// Attach an observer for store failures during acquisition.
    ///
    /// Failures are still retried; the sink only gets to see them.
    pub fn with_exception_sink(mut self, sink: impl ExceptionSink + 'static) -> Self {
        self.exception_sink = Some(Arc::new(sink));
        self
    }

    pub fn store(&self) -> &Arc<dyn StoreConnection> {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub fn exception_sink(&self) -> Option<&dyn ExceptionSink> {
        self.exception_sink.as_deref()
    }
}

impl fmt::Debug for LockOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockOptions")
            .field("timeout", &self.timeout)
            .field("retry_delay", &self.retry_delay)
            .field("exception_sink", &self.exception_sink.is_some())
            .finish_non_exhaustive()
    }
}
