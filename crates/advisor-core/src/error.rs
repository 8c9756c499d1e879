//! Error types for the AdvisorOP client.

use thiserror::Error;

/// A shared error type for the whole client.
///
/// Library crates return this type; binaries wrap it in `anyhow` at the top
/// level. Stores never surface it directly to the user, they turn it into a
/// short human-readable string instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdvisorError {
    /// The backend answered with a non-success HTTP status.
    #[error("HTTP error! status: {status} ({message})")]
    Http { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AdvisorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an HTTP status error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a transport-level failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if the backend reported the requested entity as missing (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AdvisorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AdvisorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AdvisorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AdvisorError>`.
pub type Result<T> = std::result::Result<T, AdvisorError>;
