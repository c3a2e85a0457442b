//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for keylock.
///
/// This struct represents the contents of `keylock.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Store settings
    // =========================================================================
    /// Which backend holds the claims.
    #[serde(default)]
    pub store: StoreKind,

    /// Directory of lock files for the `file` store.
    #[serde(default = "default_lock_dir")]
    pub lock_dir: String,

    /// Connection URL for the `redis` store.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    // =========================================================================
    // Lock settings
    // =========================================================================
    /// How long to keep trying to claim a key, in milliseconds.
    /// Also the claim's expiry in the store.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Wait between failed claims, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    // =========================================================================
    // Logging settings
    // =========================================================================
    /// Log level when `KEYLOCK_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            lock_dir: default_lock_dir(),
            redis_url: default_redis_url(),
            timeout_ms: default_timeout_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}
