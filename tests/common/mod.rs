//! Common test utilities and helpers

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated working directory and home for running the `parmap` binary
pub struct TestEnv {
    temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::create_dir_all(temp_dir.path().join("home"))?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `parmap.toml` into the working directory
    pub fn with_project_config(self, contents: &str) -> Result<Self> {
        fs::write(self.path().join("parmap.toml"), contents)?;
        Ok(self)
    }

    /// Write an arbitrary file relative to the working directory
    pub fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// `parmap` command that cannot see the user's real configuration
    pub fn command(&self) -> Command {
        let home = self.path().join("home");
        let mut cmd = Command::cargo_bin("parmap").unwrap();
        cmd.current_dir(self.path())
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env_remove("PARMAP_WORKERS")
            .env_remove("PARMAP_LOG_LEVEL")
            .env_remove("PARMAP_SAMPLE_SIZE")
            .env_remove("RUST_LOG");
        cmd
    }
}
