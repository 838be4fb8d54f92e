//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `merge`: Print the merged configuration
//! - `validate`: Check that configuration files load and merge
//! - `get`: Print a single value from the merged configuration
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod get;
pub mod merge;
pub mod validate;

pub use completions::CompletionsCommand;
pub use get::GetCommand;
pub use merge::MergeCommand;
pub use validate::ValidateCommand;
