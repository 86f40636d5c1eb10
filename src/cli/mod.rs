//! CLI command definitions and status output.
//!
//! Data callers capture (keys, manufacturer ids, script output) goes to
//! stdout. Status lines and warnings go to stderr so they never mix into it.

pub mod args;

use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use devkeys::config::{Config, ConfigError};
use devkeys::constants::EXIT_FAILURE;
use devkeys::env::Env;
use devkeys::keymgr::{KeyMgrError, Outcome};

/// Map an error to the process exit status.
///
/// The first `KeyMgrError` anywhere in the chain decides; anything else is a
/// generic failure.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<KeyMgrError>())
        .map(KeyMgrError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

/// Resolve the key store path.
///
/// An explicit `--keys-file` (relative to `cwd`) is used as is and the
/// project config is not read at all.
pub fn resolve_keys_path(
    keys_file: Option<PathBuf>,
    cwd: &Path,
    project_root: &Path,
    env: &Env,
) -> Result<PathBuf, ConfigError> {
    match keys_file {
        Some(path) => Ok(cwd.join(path)),
        None => Ok(Config::load(project_root, env)?.keys_path(project_root)),
    }
}

/// Format a status line for a completed key manager command.
///
/// Returns `None` for commands whose only output is the printed value.
pub fn outcome_message(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::Generated {
            device_id,
            manufacturer_id,
            replaced,
        } => {
            let verb = if *replaced { "Regenerated" } else { "Generated" };
            Some(format!(
                "{verb} key for {} (manufacturer {manufacturer_id})",
                device_id.bold()
            ))
        }
        Outcome::Dumped { output, devices } => Some(format!(
            "Wrote {devices} key(s) to {}",
            output.display().to_string().bold()
        )),
        Outcome::Printed => None,
    }
}

/// Print a green check-marked status line to stderr.
pub fn print_status(message: &str) {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "  {} {message}", "✓".green());
    let _ = handle.flush();
}

/// Print a yellow warning line to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", "Warning:".yellow());
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use devkeys::constants::{EXIT_NOT_FOUND, EXIT_USAGE};

    #[test]
    fn exit_code_for_missing_argument() {
        let err = anyhow::Error::new(KeyMgrError::MissingArgument("--dev-id"));
        assert_eq!(exit_code(&err), EXIT_USAGE);
    }

    #[test]
    fn exit_code_for_device_not_found_under_context() {
        let result: Result<(), KeyMgrError> = Err(KeyMgrError::DeviceNotFound("dev2".into()));
        let err = result.context("export failed").unwrap_err();
        assert_eq!(exit_code(&err), EXIT_NOT_FOUND);
    }

    #[test]
    fn exit_code_for_other_errors() {
        assert_eq!(exit_code(&anyhow::anyhow!("config broken")), EXIT_FAILURE);

        let io = std::io::Error::other("disk full");
        let err = anyhow::Error::new(KeyMgrError::Stdout(io));
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }

    fn broken_config_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".devkeys.toml"), "not valid {{ toml").unwrap();
        dir
    }

    #[test]
    fn explicit_keys_file_skips_config() {
        let root = broken_config_root();
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let path = resolve_keys_path(
            Some(PathBuf::from("k.json")),
            Path::new("/work"),
            root.path(),
            &env,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/work/k.json"));
    }

    #[test]
    fn configured_keys_path_reports_broken_config() {
        let root = broken_config_root();
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let err = resolve_keys_path(None, Path::new("/work"), root.path(), &env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFile { .. }));
    }

    #[test]
    fn generated_message_names_device() {
        colored::control::set_override(false);
        let msg = outcome_message(&Outcome::Generated {
            device_id: "dev1".into(),
            manufacturer_id: "acme".into(),
            replaced: false,
        })
        .unwrap();
        assert_eq!(msg, "Generated key for dev1 (manufacturer acme)");
    }

    #[test]
    fn regenerated_message() {
        colored::control::set_override(false);
        let msg = outcome_message(&Outcome::Generated {
            device_id: "dev1".into(),
            manufacturer_id: "acme".into(),
            replaced: true,
        })
        .unwrap();
        assert!(msg.starts_with("Regenerated"));
    }

    #[test]
    fn dumped_message_counts_devices() {
        colored::control::set_override(false);
        let msg = outcome_message(&Outcome::Dumped {
            output: PathBuf::from("build/keys.h"),
            devices: 3,
        })
        .unwrap();
        assert_eq!(msg, "Wrote 3 key(s) to build/keys.h");
    }

    #[test]
    fn printed_has_no_message() {
        assert!(outcome_message(&Outcome::Printed).is_none());
    }

    #[test]
    fn print_helpers_do_not_panic() {
        print_status("ok");
        print_warning("careful");
    }
}
