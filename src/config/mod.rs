//! Configuration loading and layering.
//!
//! Handles `.devkeys.toml` loading and environment variable overrides.
//! CLI flags are merged on top by the binary.

pub mod loader;

pub use loader::{Config, ConfigError};
