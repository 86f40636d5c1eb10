//! JSON file backing for the key store.
//!
//! The whole registry lives in one pretty-printed JSON object. Every save
//! rewrites the file in full through a temp-file-and-rename so readers never
//! see a half-written store.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::KeyStore;

/// Errors reading or writing the key store file.
#[derive(Error, Debug)]
pub enum KeyStoreError {
    #[error("failed to read key store {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("key store {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write key store {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Handle to the key store file at an explicit path.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. A missing file yields an empty store.
    pub fn load(&self) -> Result<KeyStore, KeyStoreError> {
        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(KeyStore::new()),
            Err(e) => {
                return Err(KeyStoreError::ReadFile {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        serde_json::from_slice(&content).map_err(|e| KeyStoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Replace the file with the full contents of `store`.
    pub fn save(&self, store: &KeyStore) -> Result<(), KeyStoreError> {
        let mut content = serde_json::to_string_pretty(store).map_err(|e| KeyStoreError::WriteFile {
            path: self.path.clone(),
            source: std::io::Error::other(e),
        })?;
        content.push('\n');

        write_atomic(&self.path, content.as_bytes()).map_err(|e| KeyStoreError::WriteFile {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Write `contents` to `path` via a sibling temp file and rename.
///
/// Parent directories are created as needed. An existing target keeps its
/// permissions, and a symlinked target is written through the link. On
/// failure the previous file, if any, is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    if let Ok(existing) = std::fs::metadata(&path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| e.error)?;
    Ok(())
}
