//! Configuration service implementation.
//!
//! Loads `ClientConfig` from `~/.config/advisor/config.toml`, writing a
//! default file on first run, and applies environment overrides.

use crate::paths::AdvisorPaths;
use advisor_core::config::ClientConfig;
use advisor_core::error::{AdvisorError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variable overriding `server.base_url`.
pub const BASE_URL_ENV: &str = "ADVISOR_BASE_URL";
/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "ADVISOR_LOG";

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the config file resolved by `paths`.
    pub fn new(paths: &AdvisorPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| AdvisorError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// Environment overrides are applied on every load.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|p| p.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_config()?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|p| p.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|p| p.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            let default_config = ClientConfig::default();
            if let Err(e) = self.write_default(&default_config) {
                tracing::warn!(
                    "[ConfigService] Could not create default config at {}: {}",
                    self.path.display(),
                    e
                );
            } else {
                tracing::info!(
                    "[ConfigService] Created default config at {}",
                    self.path.display()
                );
            }
            return Ok(default_config);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: ClientConfig = toml::from_str(&content).map_err(|e| {
            AdvisorError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!("[ConfigService] Loaded config from {}", self.path.display());
        Ok(config)
    }

    fn write_default(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Applies `ADVISOR_BASE_URL` / `ADVISOR_LOG` from `lookup` onto `config`.
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.server.base_url = url.trim().to_string();
    }
    if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level.trim().to_string();
    }
}
