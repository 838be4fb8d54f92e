#![deny(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # confbind
//!
//! Layered configuration files bound onto typed structs.
//!
//! Loading happens in two stages. The merge loader reads any number of
//! JSON or YAML files and deep-merges them, later files overriding earlier
//! ones. The binder then walks a schema derived from the target type,
//! resolving `!ENV` references and coercing scalars, and reports every
//! problem with the dotted key path where it occurred.
//!
//! ## Core Types
//!
//! - [`ConfigLoader`] and [`ConfigMerger`]: file dispatch and deep merging
//! - [`MergedTree`]: the merged result
//! - [`Binder`], [`FieldType`] and [`SchemaDef`]: type-directed binding
//! - [`ConfigBuilder`] and [`Config`]: the usual entry points
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use confbind::{config_struct, Binder, ConfigMerger, IncludeDefault, MergedTree};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! config_struct! {
//!     #[derive(Debug, Deserialize)]
//!     struct Service {
//!         name: String,
//!         hosts: Vec<String>,
//!         port: u16,
//!     }
//! }
//!
//! let merger = ConfigMerger::new(IncludeDefault::from("__INCLUDE_DEFAULT__"));
//! let merged = merger.merge(vec![
//!     json!({"name": "api", "hosts": ["a"], "port": 80}).as_object().unwrap().clone(),
//!     json!({"hosts": ["__INCLUDE_DEFAULT__", "b"], "port": "8080"}).as_object().unwrap().clone(),
//! ]);
//!
//! let service: Service = Binder::default().bind(&MergedTree::new(merged)).unwrap();
//! assert_eq!(service.hosts, ["a", "b"]);
//! assert_eq!(service.port, 8080);
//! ```

pub mod binder;
pub mod config;
pub mod environment;
pub mod error;
pub mod loader;
pub mod logging;
pub mod tree;

// Re-export key types at crate root for convenience
pub use binder::{
    Binder, Configurable, FieldDef, FieldKind, FieldType, IntBounds, Primitive, SchemaBuilder,
    SchemaDef, SchemaRef,
};
pub use config::{load_config, Config, ConfigBuilder};
pub use environment::{EnvSource, EnvTag, ProcessEnv, DEFAULT_ENV_TAG};
pub use error::{Error, Result};
pub use loader::{ConfigLoader, ConfigMerger, FileLoaderFn, IncludeDefault};
pub use logging::{init_logger, resolve_log_level, LogLevel, Logger};
pub use serde_json::{Map, Value};
pub use tree::MergedTree;
