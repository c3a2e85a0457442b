//! Command implementations for keylock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each handler returns the process exit code on success.

mod list;
mod release;
mod run;


use crate::cli::Command;
use keylock::config::Config;
use keylock::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, config: &Config) -> Result<i32> {
    match command {
        Command::Run(args) => run::cmd_run(args, config),
        Command::List => list::cmd_list(config),
        Command::Release(args) => release::cmd_release(args, config),
    }
}
