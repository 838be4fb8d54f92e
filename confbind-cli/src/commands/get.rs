//! Command to print a single value from the merged configuration.

use crate::error::CliError;
use crate::utils::{load_files, render_scalar, GlobalOptions};
use clap::{Args, ValueEnum};
use confbind::{Binder, FieldType};
use std::path::PathBuf;

/// Type a value is coerced to before printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    /// Print the value as stored
    Any,
    /// Coerce to a string
    String,
    /// Coerce to an integer
    Integer,
    /// Coerce to a float
    Float,
    /// Coerce to a boolean
    Boolean,
}

impl ValueKind {
    fn field_type(self) -> FieldType {
        match self {
            Self::Any => FieldType::Any,
            Self::String => FieldType::string(),
            Self::Integer => FieldType::integer(),
            Self::Float => FieldType::float(),
            Self::Boolean => FieldType::boolean(),
        }
    }
}

/// Print a single value from the merged configuration.
#[derive(Args)]
pub struct GetCommand {
    /// Dotted key path (e.g., server.port)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Configuration files, lowest precedence first
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Coerce the value before printing; environment tags resolve for scalar kinds
    #[arg(long = "as", value_enum, default_value_t = ValueKind::Any)]
    pub kind: ValueKind,
}

impl GetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.key.trim().is_empty() {
            return Err(CliError::InvalidArguments(
                "key cannot be empty".to_string(),
            ));
        }

        let config = load_files(global, &self.files)?;
        let raw = config
            .tree()
            .get_path(&self.key)
            .ok_or_else(|| CliError::SemanticFailure(format!("Key not found: {}", self.key)))?;

        let binder = Binder::new(config.env_tag().cloned());
        let value = binder.populate(raw, &self.kind.field_type(), &self.key)?;

        println!("{}", render_scalar(&value)?);
        Ok(())
    }
}
