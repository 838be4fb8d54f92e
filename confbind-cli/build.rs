//! Build script for confbind-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    let files = || {
        Arg::new("files")
            .value_name("FILES")
            .help("Configuration files, lowest precedence first")
            .required(true)
            .num_args(1..)
    };

    Command::new("confbind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merge and inspect layered configuration files")
        .long_about(
            "Command-line tool for merging layered JSON and YAML configuration files \
             and reading typed values from the result",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("env-tag")
                .long("env-tag")
                .help("Tag marking environment variable references")
                .value_name("TAG")
                .global(true)
                .env("CONFBIND_ENV_TAG")
                .default_value("!ENV"),
        )
        .arg(
            Arg::new("no-env-tag")
                .long("no-env-tag")
                .help("Disable environment variable references (overrides --env-tag)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("include-default")
                .long("include-default")
                .help("Marker that makes a list extend the previous file's list (repeatable)")
                .value_name("MARKER")
                .global(true)
                .action(ArgAction::Append),
        )
        .subcommands(vec![
            Command::new("merge")
                .about("Print the merged configuration")
                .long_about("Merge every file in order and print the result as JSON or YAML")
                .arg(files())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "yaml"])
                        .default_value("json")
                        .help("Output format"),
                ),
            Command::new("validate")
                .about("Check that configuration files load and merge")
                .long_about("Load and merge every file, reporting the first error")
                .arg(files()),
            Command::new("get")
                .about("Print a single value from the merged configuration")
                .long_about("Look up a dotted key path and optionally coerce the value")
                .arg(Arg::new("key").value_name("KEY").required(true))
                .arg(files())
                .arg(
                    Arg::new("as")
                        .long("as")
                        .value_parser(["any", "string", "integer", "float", "boolean"])
                        .default_value("any")
                        .help("Coerce the value before printing"),
                ),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("confbind.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
