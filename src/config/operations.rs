//! Config loading, validation, and store construction.

use super::model::Config;
use super::types::{DEFAULT_CONFIG_FILE, LOG_LEVELS, StoreKind};
use crate::error::{LockError, Result};
use crate::locks::LockOptions;
use crate::store::{FileStore, StoreConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockError::Configuration)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config to use.
    ///
    /// An explicit path must exist. Without one, `keylock.yaml` in the current
    /// directory is used if present, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::discover() {
                Some(path) => Self::load(path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Path of `keylock.yaml` in the current directory, if it exists.
    pub fn discover() -> Option<PathBuf> {
        let path = std::env::current_dir().ok()?.join(DEFAULT_CONFIG_FILE);
        path.is_file().then_some(path)
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            LockError::Configuration(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `timeout_ms` and `retry_delay_ms` must be positive
    /// - `lock_dir` must be non-empty for the file store
    /// - `log_level` must be a known level
    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(LockError::Configuration(
                "config validation failed: timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.retry_delay_ms == 0 {
            return Err(LockError::Configuration(
                "config validation failed: retry_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.store == StoreKind::File && self.lock_dir.trim().is_empty() {
            return Err(LockError::Configuration(
                "config validation failed: lock_dir must be non-empty for the file store"
                    .to_string(),
            ));
        }

        let level = self.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(LockError::Configuration(format!(
                "config validation failed: unknown log_level '{}' (expected one of: {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Open the configured store backend.
    pub fn open_store(&self) -> Result<Arc<dyn StoreConnection>> {
        match self.store {
            StoreKind::File => Ok(Arc::new(FileStore::new(&self.lock_dir))),
            StoreKind::Redis => self.open_redis_store(),
        }
    }

    /// Open the file store, failing if another backend is configured.
    pub fn file_store(&self) -> Result<FileStore> {
        match self.store {
            StoreKind::File => Ok(FileStore::new(&self.lock_dir)),
            other => Err(LockError::Configuration(format!(
                "this operation needs the file store, but store is '{}'",
                other.as_str()
            ))),
        }
    }

    /// Build validated lock options over `store`.
    pub fn lock_options(&self, store: Arc<dyn StoreConnection>) -> Result<LockOptions> {
        LockOptions::new(store, self.timeout(), self.retry_delay())
    }

    #[cfg(feature = "redis")]
    fn open_redis_store(&self) -> Result<Arc<dyn StoreConnection>> {
        let store = crate::store::RedisStore::open(&self.redis_url)?;
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "redis"))]
    fn open_redis_store(&self) -> Result<Arc<dyn StoreConnection>> {
        Err(LockError::Configuration(
            "store 'redis' requires keylock to be built with the `redis` feature".to_string(),
        ))
    }
}
