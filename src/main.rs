//! devkeys — device key store and build helpers.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use devkeys::compile_commands;
use devkeys::config::Config;
use devkeys::env::Env;
use devkeys::keymgr::KeyManager;
use devkeys::project;

use std::io::Write;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Command, KeymgrArgs};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(cli::exit_code(&err));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let project_root = project::resolve_project_root(cli.project_root.as_deref(), &env, &cwd);

    match cli.command {
        Command::Keymgr(args) => {
            let keys_path = cli::resolve_keys_path(cli.keys_file, &cwd, &project_root, &env)
                .context("failed to load configuration")?;
            run_keymgr(args, KeyManager::new(keys_path))
        }
        Command::ExportCompileCommands => {
            let config = Config::load(&project_root, &env).context("failed to load configuration")?;
            let script = config.export_script(&project_root);
            run_export_compile_commands(&script, &project_root)
        }
    }
}

/// Run one key manager command.
fn run_keymgr(args: KeymgrArgs, manager: KeyManager) -> Result<()> {
    if !args.generate && args.manufacturer_id.is_some() {
        cli::print_warning("--manufacturer-id is only used with --generate");
    }

    let op = args.operation();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = manager.run(&op, &mut out)?;
    out.flush().context("failed to flush stdout")?;

    if let Some(message) = cli::outcome_message(&outcome) {
        cli::print_status(&message);
    }
    Ok(())
}

/// Run the compile-commands export script and echo its output.
fn run_export_compile_commands(script: &Path, project_root: &Path) -> Result<()> {
    let output = compile_commands::export_compile_commands(script, project_root)?;
    print!("{output}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    Ok(())
}
