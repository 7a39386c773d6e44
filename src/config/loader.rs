use super::{get_global_config_dir, Config, IgnoredOverride};
use crate::error::{ErrorCode, ErrorExt, ParmapError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "parmap.toml";
/// File name looked up in the global config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Resolved configuration plus the environment overrides that were skipped
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub ignored: Vec<IgnoredOverride>,
}

/// Resolves and reads the TOML configuration.
///
/// Precedence: explicit path, then `./parmap.toml`, then the global
/// `config.toml`, then defaults. Environment overrides apply last.
pub struct ConfigLoader {
    search_dir: PathBuf,
    global_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            search_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            global_dir: get_global_config_dir().ok(),
        }
    }

    /// Loader with fixed lookup directories, for tests and embedding
    pub fn with_dirs(search_dir: impl Into<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            search_dir: search_dir.into(),
            global_dir,
        }
    }

    /// Pick the configuration file to read, if any.
    ///
    /// An explicit path must exist; implicit locations are skipped when
    /// missing.
    pub fn resolve_path(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ParmapError::config_with_code(
                    ErrorCode::CONFIG_NOT_FOUND,
                    format!("Configuration file not found: {}", path.display()),
                    Some(path.to_path_buf()),
                ));
            }
            return Ok(Some(path.to_path_buf()));
        }

        let project = self.search_dir.join(PROJECT_CONFIG_FILE);
        if project.is_file() {
            return Ok(Some(project));
        }

        Ok(self
            .global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_CONFIG_FILE))
            .filter(|path| path.is_file()))
    }

    /// Load configuration using the process environment for overrides
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadedConfig> {
        self.load_with(explicit, |key| std::env::var(key).ok())
    }

    /// Load configuration with an injected environment lookup
    pub fn load_with<F>(&self, explicit: Option<&Path>, lookup: F) -> Result<LoadedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.resolve_path(explicit)? {
            Some(path) => Self::load_file(&path)?,
            None => {
                debug!("No configuration file found, using defaults");
                Config::new()
            }
        };

        let ignored = config.merge_env_with(lookup);
        config.validate()?;
        Ok(LoadedConfig { config, ignored })
    }

    /// Read and parse a single TOML file
    pub fn load_file(path: &Path) -> Result<Config> {
        debug!("Loading configuration from {}", path.display());

        let content =
            fs::read_to_string(path).to_config_error(path, ErrorCode::CONFIG_PATH_ERROR)?;
        let config: Config =
            toml::from_str(&content).to_config_error(path, ErrorCode::CONFIG_INVALID_TOML)?;
        Ok(config)
    }
}
