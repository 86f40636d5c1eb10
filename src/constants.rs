//! App-wide constants.
//!
//! Centralises the tool name, file names, environment variable names,
//! and key geometry so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "devkeys";

/// Crate version, shown by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of a device key in bytes.
pub const KEY_LEN: usize = 32;

/// Default key store filename, relative to the project root.
pub const KEYS_FILENAME: &str = "keys.json";

/// Project-local config filename (e.g. `.devkeys.toml` in the project root).
pub const CONFIG_FILENAME: &str = ".devkeys.toml";

/// Directory that marks the top of a west workspace.
pub const WORKSPACE_MARKER: &str = ".west";

/// Default compile-commands export script, relative to the project root.
pub const EXPORT_SCRIPT: &str = "scripts/export_compile_commands.sh";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROJECT_ROOT: &str = "DEVKEYS_PROJECT_ROOT";
pub const ENV_KEYS_FILE: &str = "DEVKEYS_KEYS_FILE";
pub const ENV_EXPORT_SCRIPT: &str = "DEVKEYS_EXPORT_SCRIPT";

// ── Exit statuses ───────────────────────────────────────────────────

/// Generic failure (I/O, corrupt store, config).
pub const EXIT_FAILURE: i32 = 1;

/// A required argument was missing; nothing was changed.
pub const EXIT_USAGE: i32 = 2;

/// The requested device id is not in the key store.
pub const EXIT_NOT_FOUND: i32 = 3;
