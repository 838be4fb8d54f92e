//! Main entry point for the confbind CLI.
//!
//! This is the command-line interface for layered configuration files.
//! It provides commands for inspecting merged configuration:
//! - `merge`: Print the merged configuration as JSON or YAML
//! - `validate`: Check that every file loads and merges
//! - `get`: Print one value, optionally coerced to a type

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = confbind::init_logger(cli.verbose, cli.quiet);

    let result = GlobalOptions::new(
        cli.verbose,
        cli.quiet,
        &cli.env_tag,
        cli.no_env_tag,
        cli.include_default,
    )
    .and_then(|global| match cli.command {
        cli::Command::Merge(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Get(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    });

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
