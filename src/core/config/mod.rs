//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Chronicle has one configuration scope: user-level (global) settings. Its
//! only load-bearing value is the default library root.
//!
//! # Precedence
//!
//! The effective library root is resolved in this order (earlier wins):
//! 1. `--library` CLI flag
//! 2. `$CHRONICLE_LIBRARY` environment variable
//! 3. `library` from the global config file
//! 4. `./books`
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$CHRONICLE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/chronicle/config.toml`
//! 3. `~/.chronicle/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use chronicle::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! let root = config.library_root(None);
//! println!("books live in {}", root.display());
//! ```

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default library root when nothing else is configured.
pub const DEFAULT_LIBRARY_DIR: &str = "books";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration.
    pub global: GlobalConfig,
    /// Path to the global config file (if one was loaded).
    global_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// A missing config file is not an error (defaults are used).
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_global_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let global: GlobalConfig =
            toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Self {
            global,
            global_path: Some(path.to_path_buf()),
        })
    }

    /// Locate the global config file, if any of the candidate paths exist.
    ///
    /// `$CHRONICLE_CONFIG` is returned even when the file does not exist, so
    /// a broken explicit path surfaces as an error instead of being skipped.
    fn find_global_path() -> Option<PathBuf> {
        if let Some(explicit) = std::env::var_os("CHRONICLE_CONFIG") {
            return Some(PathBuf::from(explicit));
        }

        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            let candidate = PathBuf::from(xdg).join("chronicle").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        dirs::home_dir().map(|home| home.join(".chronicle").join("config.toml"))
    }

    /// Path of the loaded global config file, if one was loaded.
    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Resolve the effective library root.
    ///
    /// Precedence: `flag` > `$CHRONICLE_LIBRARY` > config > `./books`.
    pub fn library_root(&self, flag: Option<&Path>) -> PathBuf {
        let env = std::env::var_os("CHRONICLE_LIBRARY").map(PathBuf::from);
        self.resolve_library(flag, env.as_deref())
    }

    /// Precedence logic, separated from environment access for testing.
    pub fn resolve_library(&self, flag: Option<&Path>, env: Option<&Path>) -> PathBuf {
        if let Some(flag) = flag {
            return flag.to_path_buf();
        }
        if let Some(env) = env {
            return env.to_path_buf();
        }
        if let Some(configured) = &self.global.library {
            return configured.clone();
        }
        PathBuf::from(DEFAULT_LIBRARY_DIR)
    }
}
