//! High-level entry points tying loading and binding together.
//!
//! # Examples
//!
//! Loading with defaults:
//!
//! ```no_run
//! use confbind::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.yaml"), ["config.local.yaml"]).unwrap();
//! println!("{}", config.tree());
//! ```
//!
//! Tuning the load:
//!
//! ```no_run
//! use confbind::ConfigBuilder;
//!
//! let config = ConfigBuilder::new("base.yaml")
//!     .with_file("production.yaml")
//!     .include_default("__INCLUDE_DEFAULT__")
//!     .env_tag("!SECRET")
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::binder::{Binder, Configurable};
use crate::environment::EnvTag;
use crate::error::Result;
use crate::loader::{ConfigLoader, FileLoaderFn, IncludeDefault};
use crate::tree::MergedTree;

/// Builder for loading a [`Config`].
pub struct ConfigBuilder {
    base: PathBuf,
    overrides: Vec<PathBuf>,
    include_default: IncludeDefault,
    env_tag: Option<EnvTag>,
    file_loaders: Vec<(String, FileLoaderFn)>,
}

impl ConfigBuilder {
    /// Starts a load from the `base` file.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            overrides: Vec::new(),
            include_default: IncludeDefault::Disabled,
            env_tag: Some(EnvTag::default()),
            file_loaders: Vec::new(),
        }
    }

    /// Adds a file merged over everything before it.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides.push(path.into());
        self
    }

    /// Adds several files, merged in iteration order.
    #[must_use]
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.overrides.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the marker(s) that make lists append instead of replace.
    #[must_use]
    pub fn include_default(mut self, markers: impl Into<IncludeDefault>) -> Self {
        self.include_default = markers.into();
        self
    }

    /// Sets the environment tag. An empty tag disables resolution.
    #[must_use]
    pub fn env_tag(mut self, tag: &str) -> Self {
        self.env_tag = EnvTag::new(tag);
        self
    }

    /// Disables environment tag resolution.
    #[must_use]
    pub fn without_env_tag(mut self) -> Self {
        self.env_tag = None;
        self
    }

    /// Registers a reader for `extension`, overriding built-in readers.
    #[must_use]
    pub fn with_file_loader<F>(mut self, extension: &str, loader: F) -> Self
    where
        F: Fn(&mut dyn Read) -> Result<Value> + 'static,
    {
        self.file_loaders
            .push((extension.to_string(), Box::new(loader)));
        self
    }

    /// Loads and merges every file.
    ///
    /// # Errors
    ///
    /// Returns the first loading error.
    pub fn build(self) -> Result<Config> {
        let mut loader = ConfigLoader::new(self.include_default, self.env_tag.clone());
        for (extension, file_loader) in self.file_loaders {
            loader.register(&extension, file_loader);
        }

        let tree = loader.load_all(&self.base, &self.overrides)?;
        Ok(Config {
            tree,
            env_tag: self.env_tag,
        })
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extensions: Vec<&String> = self.file_loaders.iter().map(|(ext, _)| ext).collect();
        f.debug_struct("ConfigBuilder")
            .field("base", &self.base)
            .field("overrides", &self.overrides)
            .field("include_default", &self.include_default)
            .field("env_tag", &self.env_tag)
            .field("file_loaders", &extensions)
            .finish()
    }
}

/// A loaded configuration ready to be bound.
#[derive(Debug, Clone)]
pub struct Config {
    tree: MergedTree,
    env_tag: Option<EnvTag>,
}

impl Config {
    /// Wraps an already merged tree.
    #[must_use]
    pub fn new(tree: MergedTree, env_tag: Option<EnvTag>) -> Self {
        Self { tree, env_tag }
    }

    /// The merged tree.
    #[must_use]
    pub fn tree(&self) -> &MergedTree {
        &self.tree
    }

    /// Consumes the config, returning the merged tree.
    #[must_use]
    pub fn into_tree(self) -> MergedTree {
        self.tree
    }

    /// The environment tag used for loading and binding.
    #[must_use]
    pub fn env_tag(&self) -> Option<&EnvTag> {
        self.env_tag.as_ref()
    }

    /// A binder over the process environment using this config's tag.
    #[must_use]
    pub fn binder(&self) -> Binder {
        Binder::new(self.env_tag.clone())
    }

    /// Binds the merged tree into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree does not fit `T`'s schema.
    pub fn bind<T: Configurable>(&self) -> Result<T> {
        self.binder().bind(&self.tree)
    }
}

/// Loads `base` and `overrides` with default options.
///
/// Lists are always replaced and `!ENV` tags are recognized.
///
/// # Errors
///
/// Returns the first loading error.
pub fn load_config<I, P>(base: impl Into<PathBuf>, overrides: I) -> Result<Config>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    ConfigBuilder::new(base)
        .with_files(overrides.into_iter().map(|p| p.as_ref().to_path_buf()))
        .build()
}
