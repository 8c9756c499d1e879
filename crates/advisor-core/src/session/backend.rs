//! Remote chat backend trait.
//!
//! Defines the interface to the service that generates replies and owns
//! session storage.

use super::message::ChatMessage;
use super::model::ChatSession;
use super::stats::SessionStats;
use crate::error::Result;
use async_trait::async_trait;

/// Transcript of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
    /// Key of the session the transcript belongs to. When no key was asked
    /// for, this is the key the backend chose.
    pub session_key: String,
}

/// Assistant reply to a sent message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Reply body, possibly containing inline markup.
    pub response: String,
    /// Display-formatted time of the reply.
    pub timestamp: String,
    /// Session that received the message (created by the backend if none was given).
    pub session_key: String,
    pub message_id: Option<i64>,
}

/// Result of starting a new chat.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChat {
    pub status: String,
    pub message: String,
    pub session_key: String,
}

/// All sessions visible to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionListing {
    pub sessions: Vec<ChatSession>,
    pub user_id: String,
}

/// Backend health report.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// An abstract client for the remote chat service.
///
/// Every call is a single request/response round trip with no retry.
/// Implementations are stateless with respect to sessions: the session key is
/// always passed in explicitly, and callers decide which key to track.
///
/// # Errors
///
/// Any non-success HTTP status or transport failure is returned as an
/// [`crate::AdvisorError`]; nothing is swallowed at this layer.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Fetches the transcript of `session_key`.
    ///
    /// With `None` the backend picks the "current" session (in practice a
    /// fresh, empty one) and reports its key.
    async fn fetch_history(&self, session_key: Option<&str>) -> Result<ChatTranscript>;

    /// Posts `message` to `session_key`, creating a session when `None`.
    async fn send_message(&self, message: &str, session_key: Option<&str>) -> Result<ChatReply>;

    /// Starts a new chat. The backend may use `previous_key` to finalize the
    /// session being left.
    async fn start_new_chat(&self, previous_key: Option<&str>) -> Result<NewChat>;

    /// Lists every session of the caller.
    async fn list_sessions(&self) -> Result<SessionListing>;

    /// Archives (`true`) or unarchives (`false`) a session.
    async fn set_archived(&self, session_key: &str, archived: bool) -> Result<()>;

    /// Fetches statistics for a session.
    ///
    /// Returns `Ok(None)` when the backend does not know the session.
    async fn session_stats(&self, session_key: &str) -> Result<Option<SessionStats>>;

    /// Queries the backend health endpoint.
    async fn health(&self) -> Result<HealthStatus>;
}
