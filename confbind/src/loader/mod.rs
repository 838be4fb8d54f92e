//! Loading and merging configuration files.
//!
//! Each file is parsed by a loader chosen from its extension, then the
//! parsed trees are folded together with [`ConfigMerger`].

mod formats;
mod merger;

#[cfg(test)]
mod proptests;

pub use formats::{is_yaml_extension, FileLoaderFn, YAML_AVAILABLE, YAML_EXTENSIONS};
pub use merger::{ConfigMerger, IncludeDefault};

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::environment::EnvTag;
use crate::error::{Error, Result};
use crate::tree::{kind_name, MergedTree};

/// Reads configuration files and merges them into a [`MergedTree`].
///
/// # Examples
///
/// ```no_run
/// use confbind::{ConfigLoader, EnvTag, IncludeDefault};
/// use std::path::Path;
///
/// let loader = ConfigLoader::new(IncludeDefault::Disabled, Some(EnvTag::default()));
/// let tree = loader
///     .load_all(Path::new("base.yaml"), ["local.yaml"])
///     .unwrap();
/// println!("{tree}");
/// ```
pub struct ConfigLoader {
    loaders: HashMap<String, FileLoaderFn>,
    merger: ConfigMerger,
    env_tag: Option<EnvTag>,
}

impl ConfigLoader {
    /// Creates a loader with the built-in formats registered.
    ///
    /// `env_tag` controls how tagged YAML nodes are passed through; `None`
    /// rejects every custom YAML tag.
    #[must_use]
    pub fn new(include_default: IncludeDefault, env_tag: Option<EnvTag>) -> Self {
        let mut loader = Self {
            loaders: HashMap::new(),
            merger: ConfigMerger::new(include_default),
            env_tag,
        };

        loader.loaders.insert(".json".to_string(), formats::json_loader());
        #[cfg(feature = "yaml")]
        for extension in YAML_EXTENSIONS {
            let reader = formats::yaml_loader(loader.env_tag.clone());
            loader.loaders.insert(extension.to_string(), reader);
        }

        loader
    }

    /// Registers a loader for `extension`, replacing any existing one.
    ///
    /// A missing leading dot is added, so `"toml"` and `".toml"` are the same
    /// registration.
    pub fn register<F>(&mut self, extension: &str, loader: F)
    where
        F: Fn(&mut dyn Read) -> Result<Value> + 'static,
    {
        let extension = normalize_extension(extension);
        log::debug!("registering loader for '{extension}'");
        self.loaders.insert(extension, Box::new(loader));
    }

    /// Whether a loader is registered for `extension`.
    #[must_use]
    pub fn supports(&self, extension: &str) -> bool {
        self.loaders.contains_key(&normalize_extension(extension))
    }

    /// The merger used by [`load_all`](Self::load_all).
    #[must_use]
    pub fn merger(&self) -> &ConfigMerger {
        &self.merger
    }

    /// The environment tag passed through by the YAML reader.
    #[must_use]
    pub fn env_tag(&self) -> Option<&EnvTag> {
        self.env_tag.as_ref()
    }

    /// Load and parse a single configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if no loader handles the extension, the file cannot
    /// be read, its contents are invalid, or its root is not a mapping.
    pub fn load_file(&self, path: &Path) -> Result<Map<String, Value>> {
        let extension = extension_of(path);
        let Some(loader) = self.loaders.get(&extension) else {
            return Err(unregistered(extension));
        };

        log::debug!("loading {}", path.display());
        let mut file = BufReader::new(File::open(path)?);
        let reader: &mut dyn Read = &mut file;
        match loader(reader)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(Error::InvalidRoot {
                path: path.to_path_buf(),
                found: kind_name(&other),
            }),
        }
    }

    /// Load `base` followed by every override, merging in order.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`load_file`](Self::load_file).
    pub fn load_all<I, P>(&self, base: impl AsRef<Path>, overrides: I) -> Result<MergedTree>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut trees = vec![self.load_file(base.as_ref())?];
        for path in overrides {
            trees.push(self.load_file(path.as_ref())?);
        }

        log::debug!("merging {} configuration file(s)", trees.len());
        Ok(MergedTree::new(self.merger.merge(trees)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(IncludeDefault::Disabled, Some(EnvTag::default()))
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&String> = self.loaders.keys().collect();
        extensions.sort();
        f.debug_struct("ConfigLoader")
            .field("loaders", &extensions)
            .field("merger", &self.merger)
            .field("env_tag", &self.env_tag)
            .finish()
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

fn unregistered(extension: String) -> Error {
    if is_yaml_extension(&extension) && !YAML_AVAILABLE {
        Error::MissingOptionalDependency {
            extension,
            feature: "yaml",
        }
    } else {
        Error::UnknownFileType { extension }
    }
}
