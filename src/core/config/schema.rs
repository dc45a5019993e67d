//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$CHRONICLE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/chronicle/config.toml`
//! 3. `~/.chronicle/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g. the library root must not be empty).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// library = "/home/me/books"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default library root: the directory holding one `<id>.json` per book.
    pub library: Option<PathBuf>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(library) = &self.library {
            if library.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "library must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
