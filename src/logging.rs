//! Logging setup for the keylock binary.
//!
//! Library code only emits `tracing` events; this installs the subscriber.
//! Logs go to stderr so a child program's stdout stays clean.

use keylock::config::Config;
use keylock::error::{LockError, Result};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive, e.g. `keylock=debug`.
pub const LOG_ENV: &str = "KEYLOCK_LOG";

/// Level used when `KEYLOCK_LOG` is unset.
pub fn default_level(config: &Config, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &Config, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(config, verbose)));
    let registry = Registry::default().with(filter);

    // The layer types differ, so each format gets its own branch
    let installed = if config.log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| LockError::Configuration(format!("failed to initialize logging: {}", e)))
}
