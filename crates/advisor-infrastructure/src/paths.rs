//! Unified path management for the client's configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/advisor/           # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── logs/                    # Log files of the terminal UI
//!     └── advisor.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "advisor";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves client paths, optionally rooted somewhere other than the
/// platform config directory (tests, `--config-dir`).
#[derive(Debug, Clone, Default)]
pub struct AdvisorPaths {
    base_override: Option<PathBuf>,
}

impl AdvisorPaths {
    /// Creates a resolver. With `Some(dir)`, `dir` replaces `~/.config/advisor`.
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the client configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/advisor/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to config.toml
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the log directory, honoring an explicit override from config.
    pub fn log_dir(&self, configured: Option<&Path>) -> Result<PathBuf, PathError> {
        match configured {
            Some(dir) => Ok(dir.to_path_buf()),
            None => Ok(self.config_dir()?.join("logs")),
        }
    }
}
