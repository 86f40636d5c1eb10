//! Clap argument types and operation selection.

use clap::builder::{OsStringValueParser, TypedValueParser};
use clap::{Args, Parser};
use std::path::PathBuf;

use devkeys::keymgr::Operation;

/// Device key store and build helpers for firmware workspaces.
#[derive(Parser, Debug)]
#[command(name = devkeys::constants::APP_NAME, version = devkeys::constants::VERSION)]
pub struct Cli {
    /// Project root (default: nearest directory containing `.west`).
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Key store file (overrides `.devkeys.toml` and DEVKEYS_KEYS_FILE).
    #[arg(long, global = true)]
    pub keys_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Manage advertiser and scanner keys and device ids.
    Keymgr(KeymgrArgs),

    /// Expose the compile commands file from the build directory.
    ExportCompileCommands,
}

/// Arguments for the `keymgr` subcommand.
///
/// The flags are not mutually exclusive at parse time. When several are
/// given, the first in the order generate, export-key, cmake-dump wins;
/// with none of them the device's manufacturer id is printed.
#[derive(Args, Debug)]
pub struct KeymgrArgs {
    /// Generate a new key.
    #[arg(long, default_value_t = false)]
    pub generate: bool,

    /// Id of the device to use.
    #[arg(long)]
    pub dev_id: Option<String>,

    /// Manufacturer id to store with a generated key.
    #[arg(long)]
    pub manufacturer_id: Option<String>,

    /// Print the device's key.
    #[arg(long, default_value_t = false)]
    pub export_key: bool,

    /// Write a header file declaring all keys to this path.
    ///
    /// An empty value is accepted and treated as if the flag were absent.
    #[arg(long, value_parser = OsStringValueParser::new().map(PathBuf::from))]
    pub cmake_dump: Option<PathBuf>,
}

impl KeymgrArgs {
    /// Select the single operation this invocation runs.
    pub fn operation(self) -> Operation {
        if self.generate {
            return Operation::Generate {
                device_id: self.dev_id,
                manufacturer_id: self.manufacturer_id,
            };
        }
        if self.export_key {
            return Operation::ExportKey {
                device_id: self.dev_id,
            };
        }
        if let Some(output) = self.cmake_dump.filter(|p| !p.as_os_str().is_empty()) {
            return Operation::CmakeDump { output };
        }
        Operation::FetchManufacturerId {
            device_id: self.dev_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keymgr(args: &[&str]) -> KeymgrArgs {
        let argv = ["devkeys", "keymgr"].iter().chain(args.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Keymgr(args) => args,
            other => panic!("expected keymgr, got {other:?}"),
        }
    }

    #[test]
    fn default_operation_fetches_manufacturer_id() {
        assert_eq!(
            keymgr(&["--dev-id", "dev1"]).operation(),
            Operation::FetchManufacturerId {
                device_id: Some("dev1".into())
            }
        );
    }

    #[test]
    fn generate_takes_priority() {
        let op = keymgr(&[
            "--export-key",
            "--cmake-dump",
            "keys.h",
            "--generate",
            "--dev-id",
            "dev1",
            "--manufacturer-id",
            "acme",
        ])
        .operation();
        assert_eq!(
            op,
            Operation::Generate {
                device_id: Some("dev1".into()),
                manufacturer_id: Some("acme".into()),
            }
        );
    }

    #[test]
    fn export_key_beats_cmake_dump() {
        let op = keymgr(&["--cmake-dump", "keys.h", "--export-key", "--dev-id", "d"]).operation();
        assert_eq!(
            op,
            Operation::ExportKey {
                device_id: Some("d".into())
            }
        );
    }

    #[test]
    fn cmake_dump_selected_with_path() {
        let op = keymgr(&["--cmake-dump", "build/keys.h"]).operation();
        assert_eq!(
            op,
            Operation::CmakeDump {
                output: PathBuf::from("build/keys.h")
            }
        );
    }

    #[test]
    fn empty_cmake_dump_path_falls_through() {
        let args = keymgr(&["--cmake-dump", "", "--dev-id", "d"]);
        assert_eq!(args.cmake_dump, Some(PathBuf::new()));
        assert_eq!(
            args.operation(),
            Operation::FetchManufacturerId {
                device_id: Some("d".into())
            }
        );
    }

    #[test]
    fn generate_without_ids_still_selects_generate() {
        let op = keymgr(&["--generate"]).operation();
        assert_eq!(
            op,
            Operation::Generate {
                device_id: None,
                manufacturer_id: None,
            }
        );
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "devkeys",
            "keymgr",
            "--keys-file",
            "/tmp/k.json",
            "--project-root",
            "/work",
        ])
        .unwrap();
        assert_eq!(cli.keys_file, Some(PathBuf::from("/tmp/k.json")));
        assert_eq!(cli.project_root, Some(PathBuf::from("/work")));
    }

    #[test]
    fn export_compile_commands_takes_no_arguments() {
        let cli = Cli::try_parse_from(["devkeys", "export-compile-commands"]).unwrap();
        assert!(matches!(cli.command, Command::ExportCompileCommands));
        assert!(Cli::try_parse_from(["devkeys", "export-compile-commands", "--x"]).is_err());
    }
}
