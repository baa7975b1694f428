//! CLI exit code registry.
//!
//! Single source of truth for exit codes. They are part of the shell
//! contract: deploy scripts branch on them, so changing one is a breaking
//! change.

/// Success.
pub const EXIT_SUCCESS: u8 = 0;

/// General error (unspecified). Prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error: bad arguments, unreadable manifest.
pub const EXIT_USAGE: u8 = 2;

/// The requested key has no registered definition.
pub const EXIT_UNKNOWN_KEY: u8 = 3;

/// Store write or open failure.
pub const EXIT_STORE: u8 = 4;

/// `sync` finished but one or more keys failed; counts were printed.
pub const EXIT_SYNC_PARTIAL: u8 = 5;
