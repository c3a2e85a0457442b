//! Configuration types and defaults for keylock.
//!
//! This module defines enums, constants, and default value functions
//! used by the Config struct.

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "keylock.yaml";

/// Backend that holds the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Lock files in `lock_dir` (default; works across processes on one host
    /// or on a shared filesystem).
    #[default]
    File,
    /// A Redis server at `redis_url` (needs the `redis` feature).
    Redis,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::File => "file",
            StoreKind::Redis => "redis",
        }
    }
}

/// Log levels accepted by `log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

// Default value functions for serde
pub(crate) fn default_lock_dir() -> String {
    ".keylock/locks".to_string()
}
pub(crate) fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
pub(crate) fn default_timeout_ms() -> u64 {
    10_000
}
pub(crate) fn default_retry_delay_ms() -> u64 {
    100
}
pub(crate) fn default_log_level() -> String {
    "warn".to_string()
}
