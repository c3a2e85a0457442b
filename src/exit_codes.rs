//! Exit code constants for the keylock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, command not startable)
//! - 2: Store failure (backend unreachable, release failed)
//! - 3: Lock acquisition failure (timed out or cancelled)
//!
//! `keylock run` exits with the child's own code once the lock was held.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or a command that could not start.
pub const USER_ERROR: i32 = 1;

/// Store failure: the backend could not be reached or rejected an operation.
pub const STORE_FAILURE: i32 = 2;

/// Lock acquisition failure: the key was not claimed within the timeout.
pub const LOCK_FAILURE: i32 = 3;
