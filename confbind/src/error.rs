//! Error types for the confbind library.
//!
//! This module provides the error hierarchy for both pipeline stages
//! (loading/merging and binding), using `thiserror` for ergonomic error
//! handling. Parser and I/O errors are wrapped transparently so callers see
//! exactly what the underlying reader reported.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a confbind error.
///
/// # Examples
///
/// ```
/// use confbind::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(8080)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the confbind library.
#[derive(Debug, Error)]
pub enum Error {
    /// No loader is registered for the file extension.
    #[error("cannot parse files with the '{extension}' extension")]
    UnknownFileType {
        /// The extension, including the leading dot (empty if the file has none).
        extension: String,
    },

    /// The file format needs a cargo feature that was not compiled in.
    #[error("loading '{extension}' files requires the '{feature}' feature of confbind")]
    MissingOptionalDependency {
        /// The extension that was requested.
        extension: String,
        /// The cargo feature that provides support for it.
        feature: &'static str,
    },

    /// An I/O error occurred while reading a configuration file.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON document could not be parsed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A YAML document could not be parsed.
    #[cfg(feature = "yaml")]
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// A custom file loader rejected its input.
    #[error("failed to parse '{extension}' file: {message}")]
    Parse {
        /// The extension of the loader that failed.
        extension: String,
        /// A description of the syntax problem.
        message: String,
    },

    /// A configuration file did not contain a mapping at its root.
    #[error("configuration root of {} must be a mapping, found {found}", path.display())]
    InvalidRoot {
        /// The offending file.
        path: PathBuf,
        /// The kind of value found at the root.
        found: &'static str,
    },

    /// An environment tag referenced an unset variable and gave no default.
    #[error("could not find environment variable {name} (referenced by key: {})", display_key(key))]
    MissingEnvironmentVariable {
        /// The variable name.
        name: String,
        /// The key path holding the tag.
        key: String,
    },

    /// The configuration does not have the shape the schema expects.
    #[error("invalid configuration for key {}: {reason}", display_key(key))]
    InvalidConfig {
        /// The dotted key path of the offending location.
        key: String,
        /// What was wrong.
        reason: String,
    },

    /// A scalar could not be converted to the declared primitive type.
    #[error("cannot convert {found} to {expected} for key {}", display_key(key))]
    Coercion {
        /// The dotted key path of the offending value.
        key: String,
        /// The declared type.
        expected: String,
        /// A rendering of the value that failed to convert.
        found: String,
    },

    /// The bound configuration could not be deserialized into the target type.
    #[error("could not construct {schema} from bound configuration: {source}")]
    Construct {
        /// The schema name.
        schema: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

fn display_key(key: &str) -> &str {
    if key.is_empty() {
        "<root>"
    } else {
        key
    }
}

impl Error {
    /// Builds an [`Error::InvalidConfig`] for `key`.
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the key path the error refers to, if it has one.
    ///
    /// # Examples
    ///
    /// ```
    /// use confbind::Error;
    ///
    /// let err = Error::InvalidConfig {
    ///     key: "server.port".to_string(),
    ///     reason: "missing".to_string(),
    /// };
    /// assert_eq!(err.key(), Some("server.port"));
    /// ```
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingEnvironmentVariable { key, .. }
            | Self::InvalidConfig { key, .. }
            | Self::Coercion { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Check if error was raised while binding rather than while loading.
    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            Self::MissingEnvironmentVariable { .. }
                | Self::InvalidConfig { .. }
                | Self::Coercion { .. }
                | Self::Construct { .. }
        )
    }
}
