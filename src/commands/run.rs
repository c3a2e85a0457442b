//! Implementation of the `keylock run` command.
//!
//! Acquires the key, runs the program with inherited stdio, then releases
//! the key before returning the program's exit code.

use crate::cli::RunArgs;
use keylock::config::Config;
use keylock::error::{LockError, Result};
use keylock::exit_codes;
use keylock::{CancelSignal, LockProvider};
use std::process::{Command, ExitStatus};
use tracing::{debug, warn};

/// Execute the `keylock run` command.
pub fn cmd_run(args: RunArgs, config: &Config) -> Result<i32> {
    let mut config = config.clone();
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(retry_delay_ms) = args.retry_delay_ms {
        config.retry_delay_ms = retry_delay_ms;
    }

    let store = config.open_store()?;
    let provider = LockProvider::new(config.lock_options(store)?);

    let handle = provider.acquire(&args.key, &CancelSignal::new())?;
    let status = spawn_and_wait(&args.command);
    let released = handle.release();

    match (status, released) {
        (Ok(status), Ok(())) => Ok(exit_code_of(status)),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), released) => {
            if let Err(release_err) = released {
                warn!(error = %release_err, "release after failed spawn also failed");
            }
            Err(err)
        }
    }
}

fn spawn_and_wait(command: &[String]) -> Result<ExitStatus> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| LockError::Command("no program given".to_string()))?;

    debug!(program = %program, args = ?args, "running command under lock");

    Command::new(program)
        .args(args)
        .status()
        .map_err(|e| LockError::Command(format!("failed to run '{}': {}", program, e)))
}

/// Map a child's exit status to our exit code; signals map to `128 + signo`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    exit_codes::USER_ERROR
}
