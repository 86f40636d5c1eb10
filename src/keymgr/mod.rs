//! Key manager commands.
//!
//! Each command is one load → (mutate → save) → emit cycle over the key
//! store at an explicit path. Nothing is kept in memory between commands.

pub mod header;

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants::{EXIT_FAILURE, EXIT_NOT_FOUND, EXIT_USAGE};
use crate::keystore::store::write_atomic;
use crate::keystore::{KeyFile, KeyRecord, KeyStore, KeyStoreError};

/// Errors from key manager commands.
#[derive(Error, Debug)]
pub enum KeyMgrError {
    #[error("you need to specify {0}")]
    MissingArgument(&'static str),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error(transparent)]
    Store(#[from] KeyStoreError),

    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

impl KeyMgrError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            KeyMgrError::MissingArgument(_) => EXIT_USAGE,
            KeyMgrError::DeviceNotFound(_) => EXIT_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }
}

/// A single key manager command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Create (or replace) the key for a device.
    Generate {
        device_id: Option<String>,
        manufacturer_id: Option<String>,
    },
    /// Print a device's hex key followed by a newline.
    ExportKey { device_id: Option<String> },
    /// Write the C key table to a file.
    CmakeDump { output: PathBuf },
    /// Print a device's manufacturer id with no trailing newline.
    FetchManufacturerId { device_id: Option<String> },
}

/// What a successful command did, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Generated {
        device_id: String,
        manufacturer_id: String,
        replaced: bool,
    },
    Printed,
    Dumped { output: PathBuf, devices: usize },
}

/// Runs key manager commands against one key store file.
#[derive(Debug, Clone)]
pub struct KeyManager {
    file: KeyFile,
}

impl KeyManager {
    /// Create a manager for the key store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: KeyFile::new(path),
        }
    }

    /// Path of the backing key store file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Load the current store (sorted by device id).
    pub fn load(&self) -> Result<KeyStore, KeyMgrError> {
        Ok(self.file.load()?)
    }

    /// Dispatch `op`, writing any printed value to `out`.
    pub fn run(&self, op: &Operation, out: &mut impl Write) -> Result<Outcome, KeyMgrError> {
        match op {
            Operation::Generate {
                device_id,
                manufacturer_id,
            } => self.generate(device_id.as_deref(), manufacturer_id.as_deref()),
            Operation::ExportKey { device_id } => {
                self.export_key(device_id.as_deref(), out)?;
                Ok(Outcome::Printed)
            }
            Operation::CmakeDump { output } => {
                let devices = self.cmake_dump(output)?;
                Ok(Outcome::Dumped {
                    output: output.clone(),
                    devices,
                })
            }
            Operation::FetchManufacturerId { device_id } => {
                self.fetch_manufacturer_id(device_id.as_deref(), out)?;
                Ok(Outcome::Printed)
            }
        }
    }

    /// Generate a fresh key for `device_id`, replacing any existing record.
    ///
    /// Both ids must be non-empty; otherwise nothing is read or written.
    pub fn generate(
        &self,
        device_id: Option<&str>,
        manufacturer_id: Option<&str>,
    ) -> Result<Outcome, KeyMgrError> {
        let (Some(device_id), Some(manufacturer_id)) =
            (non_empty(device_id), non_empty(manufacturer_id))
        else {
            return Err(KeyMgrError::MissingArgument(
                "both --dev-id and --manufacturer-id",
            ));
        };

        let mut store = self.load()?;
        let previous = store.insert(device_id, KeyRecord::generate(manufacturer_id));
        self.file.save(&store)?;

        Ok(Outcome::Generated {
            device_id: device_id.to_string(),
            manufacturer_id: manufacturer_id.to_string(),
            replaced: previous.is_some(),
        })
    }

    /// Print the hex key of `device_id` followed by a newline.
    pub fn export_key(&self, device_id: Option<&str>, out: &mut impl Write) -> Result<(), KeyMgrError> {
        let device_id = non_empty(device_id).ok_or(KeyMgrError::MissingArgument("--dev-id"))?;
        let store = self.load()?;
        let record = lookup(&store, device_id)?;
        writeln!(out, "{}", record.key.to_hex()).map_err(KeyMgrError::Stdout)
    }

    /// Print the manufacturer id of `device_id` without a trailing newline.
    ///
    /// The value is typically captured into a build variable.
    pub fn fetch_manufacturer_id(
        &self,
        device_id: Option<&str>,
        out: &mut impl Write,
    ) -> Result<(), KeyMgrError> {
        let device_id = non_empty(device_id).ok_or(KeyMgrError::MissingArgument("--dev-id"))?;
        let store = self.load()?;
        let record = lookup(&store, device_id)?;
        write!(out, "{}", record.manufacturer_id).map_err(KeyMgrError::Stdout)
    }

    /// Write the key table header to `output`. Returns the number of devices.
    pub fn cmake_dump(&self, output: &Path) -> Result<usize, KeyMgrError> {
        let store = self.load()?;
        let rendered = header::render_key_table(&store);
        write_atomic(output, rendered.as_bytes()).map_err(|e| KeyMgrError::WriteOutput {
            path: output.to_path_buf(),
            source: e,
        })?;
        Ok(store.len())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn lookup<'a>(store: &'a KeyStore, device_id: &str) -> Result<&'a KeyRecord, KeyMgrError> {
    store
        .get(device_id)
        .ok_or_else(|| KeyMgrError::DeviceNotFound(device_id.to_string()))
}
