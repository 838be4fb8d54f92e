//! Command to print the merged configuration.

use crate::error::CliError;
use crate::utils::{load_files, render, GlobalOptions, OutputFormat};
use clap::Args;
use confbind::Value;
use std::path::PathBuf;

/// Print the merged configuration.
#[derive(Args)]
pub struct MergeCommand {
    /// Configuration files, lowest precedence first
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl MergeCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_files(global, &self.files)?;
        let merged = Value::Object(config.into_tree().into_inner());

        let output = render(&merged, self.format)?;
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }

        Ok(())
    }
}
