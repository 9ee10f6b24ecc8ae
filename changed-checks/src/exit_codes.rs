//! Stable exit codes for the `changed-checks` CLI.
//!
//! A failing tool's own exit status is passed through unchanged; these cover
//! the remaining outcomes.

/// Every planned step succeeded, or there was nothing to check.
pub const OK: i32 = 0;
/// Git query, config, or other runner-side failure.
pub const ERROR: i32 = 1;
/// A tool binary could not be started (mirrors the shell's "command not found").
pub const SPAWN_FAILED: i32 = 127;
