//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Writers for configuration files

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated directory for configuration files.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the confbind binary.
    ///
    /// `CONFBIND_ENV_TAG` is cleared so the caller's shell cannot leak in.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("confbind").expect("Failed to find confbind binary");
        cmd.env_remove("CONFBIND_ENV_TAG");
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a configuration file and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, contents).expect("Failed to write config file");
        path
    }

    /// Write the standard base and override pair used by most tests.
    pub fn layered(&self) -> (PathBuf, PathBuf) {
        let base = self.write(
            "base.yaml",
            r"server:
  host: localhost
  port: !ENV CONFBIND_CLI_TEST_PORT 8080
plugins:
  - auth
  - metrics
debug: false
",
        );
        let overrides = self.write(
            "override.json",
            r#"{"server": {"host": "0.0.0.0"}, "plugins": ["+", "tracing"], "debug": "yes"}"#,
        );
        (base, overrides)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
