//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{CompletionsCommand, GetCommand, MergeCommand, ValidateCommand};
use clap::{Parser, Subcommand};
use confbind::DEFAULT_ENV_TAG;

/// Command-line tool for merging and inspecting layered configuration files.
#[derive(Parser)]
#[command(name = "confbind")]
#[command(version, about = "Merge and inspect layered configuration files", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Tag marking environment variable references
    #[arg(
        long,
        value_name = "TAG",
        global = true,
        env = "CONFBIND_ENV_TAG",
        default_value = DEFAULT_ENV_TAG
    )]
    pub env_tag: String,

    /// Disable environment variable references (overrides --env-tag)
    #[arg(long, global = true)]
    pub no_env_tag: bool,

    /// Marker that makes a list extend the previous file's list (repeatable)
    #[arg(long, value_name = "MARKER", global = true)]
    pub include_default: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the merged configuration
    Merge(MergeCommand),

    /// Check that configuration files load and merge
    Validate(ValidateCommand),

    /// Print a single value from the merged configuration
    Get(GetCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
