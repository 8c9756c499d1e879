//! Client configuration model (`config.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration structure for config.toml
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Backend origin, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Unset means requests wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct UiConfig {
    /// Start with the sidebar collapsed
    #[serde(default)]
    pub sidebar_collapsed: bool,
    /// Start with the archived section expanded
    #[serde(default)]
    pub show_archived: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files. Defaults to `<config dir>/logs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
