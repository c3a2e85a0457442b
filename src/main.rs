//! keylock: run commands under a key-scoped distributed lock.
//!
//! This is the main entry point for the `keylock` CLI. It parses arguments,
//! loads the config, dispatches to the appropriate command handler, and
//! handles errors with proper exit codes.

mod cli;
mod commands;
mod logging;

use cli::Cli;
use keylock::config::Config;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let result = Config::resolve(cli.config.as_deref()).and_then(|config| {
        logging::init_logging(&config, cli.verbose)?;
        commands::dispatch(cli.command, &config)
    });

    match result {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
