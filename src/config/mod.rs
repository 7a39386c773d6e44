use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::error::{ErrorCode, ParmapError, Result};

pub mod loader;

pub use loader::{ConfigLoader, LoadedConfig};

pub const ENV_WORKERS: &str = "PARMAP_WORKERS";
pub const ENV_LOG_LEVEL: &str = "PARMAP_LOG_LEVEL";
pub const ENV_SAMPLE_SIZE: &str = "PARMAP_SAMPLE_SIZE";

/// Input size the demo and benchmark use when nothing else is configured
pub const DEFAULT_SAMPLE_SIZE: usize = 1_000_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Get the global parmap directory holding `config.toml`
pub fn get_global_config_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "parmap", "parmap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            ParmapError::config_with_code(
                ErrorCode::CONFIG_PATH_ERROR,
                "Could not determine home directory",
                None,
            )
        })
}

/// An environment override that was present but could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredOverride {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for IgnoredOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ignoring {}={:?}: {}", self.key, self.value, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Worker threads per map call; `None` means use the platform hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Element count for the `run` and `bench` commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `PARMAP_*` overrides from `lookup`.
    ///
    /// Values that do not parse leave the field untouched and are returned so
    /// the caller can report them once logging is up.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Vec<IgnoredOverride>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        if let Some(workers) = lookup(ENV_WORKERS) {
            match workers.trim().parse::<usize>() {
                Ok(value) => self.workers = Some(value),
                Err(e) => ignored.push(IgnoredOverride {
                    key: ENV_WORKERS,
                    value: workers,
                    reason: e.to_string(),
                }),
            }
        }

        if let Some(log_level) = lookup(ENV_LOG_LEVEL) {
            if !log_level.trim().is_empty() {
                self.log_level = Some(log_level);
            }
        }

        if let Some(size) = lookup(ENV_SAMPLE_SIZE) {
            match size.trim().parse::<usize>() {
                Ok(value) => self.sample_size = Some(value),
                Err(e) => ignored.push(IgnoredOverride {
                    key: ENV_SAMPLE_SIZE,
                    value: size,
                    reason: e.to_string(),
                }),
            }
        }

        ignored
    }

    /// Reject a log level that would not parse as a tracing filter
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            EnvFilter::try_new(level).map_err(|e| {
                ParmapError::config_with_code(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    format!("log_level {:?} is not a valid filter", level),
                    None,
                )
                .with_source(e)
            })?;
        }
        Ok(())
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn effective_sample_size(&self) -> usize {
        self.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
