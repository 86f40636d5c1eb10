//! Compile-commands export.
//!
//! Runs the project's export script, which copies `compile_commands.json`
//! out of the build directory, and hands back whatever it printed.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors running the export script.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to run {}: {source}", script.display())]
    Spawn {
        script: PathBuf,
        source: std::io::Error,
    },

    #[error("{} failed ({status}): {stderr}", script.display())]
    Failed {
        script: PathBuf,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("{} produced non-UTF-8 output: {source}", script.display())]
    Utf8 {
        script: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

/// Run `script` with no arguments from `project_root` and return its stdout.
pub fn export_compile_commands(script: &Path, project_root: &Path) -> Result<String, ExportError> {
    let output = Command::new(script)
        .current_dir(project_root)
        .output()
        .map_err(|e| ExportError::Spawn {
            script: script.to_path_buf(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ExportError::Failed {
            script: script.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| ExportError::Utf8 {
        script: script.to_path_buf(),
        source: e,
    })
}
