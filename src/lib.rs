//! devkeys — device key store and build helpers for firmware workspaces (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod compile_commands;
pub mod config;
pub mod constants;
pub mod env;
pub mod keymgr;
pub mod keystore;
pub mod project;
