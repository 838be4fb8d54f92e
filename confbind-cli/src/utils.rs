//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading and output formatting.

use crate::error::CliError;
use clap::ValueEnum;
use confbind::{Config, ConfigBuilder, EnvTag, IncludeDefault, Value};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Environment tag, or `None` when references are disabled.
    pub env_tag: Option<EnvTag>,

    /// Include-default markers for list merging.
    pub include_default: Vec<String>,
}

impl GlobalOptions {
    /// Build global options from the parsed tag settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the tag is blank and not disabled.
    pub fn new(
        verbose: bool,
        quiet: bool,
        env_tag: &str,
        no_env_tag: bool,
        include_default: Vec<String>,
    ) -> Result<Self, CliError> {
        let env_tag = if no_env_tag {
            None
        } else {
            Some(EnvTag::new(env_tag).ok_or_else(|| {
                CliError::InvalidArguments(
                    "--env-tag cannot be empty (use --no-env-tag to disable tags)".to_string(),
                )
            })?)
        };

        Ok(Self {
            verbose,
            quiet,
            env_tag,
            include_default,
        })
    }
}

/// Output format for rendered configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Load and merge `files` in order using the global options.
///
/// The first file is the base; every later file merges over it.
pub fn load_files(global: &GlobalOptions, files: &[PathBuf]) -> Result<Config, CliError> {
    let Some((base, overrides)) = files.split_first() else {
        return Err(CliError::InvalidArguments(
            "at least one configuration file is required".to_string(),
        ));
    };

    let mut builder = ConfigBuilder::new(base)
        .with_files(overrides)
        .include_default(IncludeDefault::from(global.include_default.clone()));
    builder = match &global.env_tag {
        Some(tag) => builder.env_tag(tag.as_str()),
        None => builder.without_env_tag(),
    };

    log::debug!("loading {} file(s)", files.len());
    Ok(builder.build()?)
}

/// Render a value in the requested format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Render a single value for `get`.
///
/// Strings print without quotes; everything else prints as JSON.
pub fn render_scalar(value: &Value) -> Result<String, CliError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Ok(serde_json::to_string_pretty(value)?),
        other => Ok(other.to_string()),
    }
}
