//! Command to validate layered configuration files.

use crate::error::CliError;
use crate::utils::{load_files, GlobalOptions};
use clap::Args;
use std::path::PathBuf;

/// Check that configuration files load and merge.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration files, lowest precedence first
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        for path in &self.files {
            if !path.exists() {
                return Err(CliError::InvalidArguments(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
        }

        match load_files(global, &self.files) {
            Ok(config) => {
                if global.verbose {
                    eprintln!(
                        "Merged {} file(s) into {} top-level key(s)",
                        self.files.len(),
                        config.tree().len()
                    );
                }
                if !global.quiet {
                    println!("Configuration is valid");
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Validation error: {e}");
                Err(CliError::SemanticFailure(
                    "Configuration validation failed".to_string(),
                ))
            }
        }
    }
}
