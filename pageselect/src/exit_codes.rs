//! Stable exit codes for selector CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid configuration or arguments, or another local error.
pub const INVALID: i32 = 1;
/// A page fetch failed.
pub const FETCH_FAILED: i32 = 2;
