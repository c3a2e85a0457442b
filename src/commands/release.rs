//! Implementation of the `keylock release` command.

use crate::cli::ReleaseArgs;
use keylock::config::Config;
use keylock::error::{LockError, Result};
use keylock::exit_codes;
use keylock::LockKey;
use tracing::info;

/// Execute the `keylock release` command.
///
/// Expires the key in the configured store without checking who holds it.
pub fn cmd_release(args: ReleaseArgs, config: &Config) -> Result<i32> {
    if !args.force {
        return Err(LockError::UserError(format!(
            "refusing to release lock without --force flag.\n\n\
             Releasing a lock lets another holder in while the current one may still be running.\n\
             Only release locks if you are certain the holder has crashed.\n\n\
             To release the lock, run:\n  keylock release {} --force",
            args.key
        )));
    }

    let key = LockKey::new(args.key);
    let store = config.open_store()?;

    store.release(key.store_key()).map_err(|source| LockError::Release {
        key: key.name().to_string(),
        source,
    })?;

    info!(key = %key, "force-released lock");
    println!("Released lock: {}", key);

    Ok(exit_codes::SUCCESS)
}
