//! CLI argument parsing for keylock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// keylock: run commands under a key-scoped distributed lock.
///
/// A lock is a claim on a key in a shared store (a lock directory or Redis).
/// Claims expire on their own, so a crashed holder never blocks a key forever.
#[derive(Parser, Debug)]
#[command(name = "keylock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of ./keylock.yaml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log lock activity at debug level (overridden by KEYLOCK_LOG).
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for keylock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program while holding a lock.
    ///
    /// Waits for the key, runs the program, then releases the key.
    /// Exits with the program's exit code.
    Run(RunArgs),

    /// List claims in the configured file store.
    ///
    /// Shows the owner, pid, age, and expiry of each claim.
    List,

    /// Release a lock regardless of who holds it.
    ///
    /// Only use this when the holder is known to be gone.
    Release(ReleaseArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Lock key (namespaced as LOCK_<KEY> in the store).
    pub key: String,

    /// Give up after this many milliseconds (defaults to the config value).
    #[arg(long, value_name = "N")]
    pub timeout_ms: Option<u64>,

    /// Wait this many milliseconds between attempts (defaults to the config value).
    #[arg(long, value_name = "N")]
    pub retry_delay_ms: Option<u64>,

    /// Program and arguments to run once the lock is held.
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "PROGRAM"
    )]
    pub command: Vec<String>,
}

/// Arguments for the `release` command.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// Lock key to release.
    pub key: String,

    /// Force the release (required for safety).
    #[arg(long, action = ArgAction::SetTrue)]
    pub force: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
