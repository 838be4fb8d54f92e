//! Common test utilities for integration tests.
//!
//! This module provides helper functions for writing configuration files
//! and scoping environment variables in tests.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Path to a file under `tests/fixtures/configs`.
#[allow(dead_code)]
pub fn fixture_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("configs")
        .join(relative)
}

/// Writes `content` to `dir/filename` and returns the path.
#[allow(dead_code)]
pub fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

/// RAII guard for setting and restoring environment variables.
///
/// Note: Tests using environment variables should not run in parallel.
/// Use the `#[serial]` attribute.
#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    old_value: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    /// Sets `key` to `value` until the guard is dropped.
    pub fn new(key: &str, value: &str) -> Self {
        let old_value = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            old_value,
        }
    }

    /// Unsets `key` until the guard is dropped.
    pub fn remove(key: &str) -> Self {
        let old_value = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            old_value,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.old_value {
            Some(val) => env::set_var(&self.key, val),
            None => env::remove_var(&self.key),
        }
    }
}
