//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags (applied by the caller)
//! 2. Environment variables
//! 3. `.devkeys.toml` in the project root
//! 4. Built-in defaults
//!
//! Relative paths resolve against the project root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keystore: KeyStoreConfig,
    pub compile_commands: CompileCommandsConfig,
}

/// Key store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyStoreConfig {
    pub path: PathBuf,
}

impl Default for KeyStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::constants::KEYS_FILENAME),
        }
    }
}

/// Compile-commands export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileCommandsConfig {
    pub script: PathBuf,
}

impl Default for CompileCommandsConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from(crate::constants::EXPORT_SCRIPT),
        }
    }
}

impl Config {
    /// Load configuration for `project_root`.
    ///
    /// Reads `.devkeys.toml` from the root if present, then applies
    /// environment variable overrides.
    pub fn load(project_root: &Path, env: &Env) -> Result<Self, ConfigError> {
        let local_path = project_root.join(crate::constants::CONFIG_FILENAME);
        let mut config = if local_path.exists() {
            Self::load_file(&local_path)?
        } else {
            Config::default()
        };

        config.apply_env_vars(env);
        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(path) = env.path(crate::constants::ENV_KEYS_FILE) {
            self.keystore.path = path;
        }
        if let Some(path) = env.path(crate::constants::ENV_EXPORT_SCRIPT) {
            self.compile_commands.script = path;
        }
    }

    /// Absolute path of the key store file.
    pub fn keys_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.keystore.path)
    }

    /// Absolute path of the compile-commands export script.
    pub fn export_script(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.compile_commands.script)
    }
}
