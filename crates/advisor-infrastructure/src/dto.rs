//! Wire formats of the chat backend's JSON API.
//!
//! Response DTOs are tolerant (unknown fields ignored, optional fields
//! defaulted) and converted into the domain types of `advisor-core`.

use advisor_core::session::{
    ChatMessage, ChatReply, ChatSession, ChatTranscript, HealthStatus, NewChat, SessionListing,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /api/chat/`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
    /// Serialized as `null` when absent; the backend then creates a session.
    pub session_key: Option<&'a str>,
}

/// Body of `POST /api/chat/new/`.
#[derive(Debug, Serialize)]
pub struct NewChatRequest<'a> {
    pub session_key: Option<&'a str>,
}

/// Body of `POST /api/chat/archive/{key}/`.
#[derive(Debug, Serialize)]
pub struct ArchiveRequest {
    pub action: ArchiveAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveAction {
    Archive,
    Unarchive,
}

impl ArchiveAction {
    pub fn from_flag(archived: bool) -> Self {
        if archived {
            Self::Archive
        } else {
            Self::Unarchive
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response of `GET /api/chat/`.
#[derive(Debug, Deserialize)]
pub struct ChatHistoryResponse {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub session_key: String,
}

impl From<ChatHistoryResponse> for ChatTranscript {
    fn from(dto: ChatHistoryResponse) -> Self {
        Self {
            messages: dto.messages,
            session_key: dto.session_key,
        }
    }
}

/// Response of `POST /api/chat/`.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
    pub session_key: String,
    #[serde(default)]
    pub message_id: Option<i64>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl From<ChatResponse> for ChatReply {
    fn from(dto: ChatResponse) -> Self {
        Self {
            response: dto.response,
            timestamp: dto.timestamp,
            session_key: dto.session_key,
            message_id: dto.message_id,
        }
    }
}

/// Response of `POST /api/chat/new/`.
#[derive(Debug, Deserialize)]
pub struct NewChatResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub session_key: String,
}

impl From<NewChatResponse> for NewChat {
    fn from(dto: NewChatResponse) -> Self {
        Self {
            status: dto.status,
            message: dto.message,
            session_key: dto.session_key,
        }
    }
}

/// Response of `GET /api/chat/history/`.
#[derive(Debug, Deserialize)]
pub struct SessionListResponse {
    #[serde(default)]
    pub sessions: Vec<ChatSession>,
    #[serde(default)]
    pub user_id: String,
}

impl From<SessionListResponse> for SessionListing {
    fn from(dto: SessionListResponse) -> Self {
        Self {
            sessions: dto.sessions,
            user_id: dto.user_id,
        }
    }
}

/// Response of `GET /api/health/`.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub timestamp: String,
}

impl From<HealthResponse> for HealthStatus {
    fn from(dto: HealthResponse) -> Self {
        Self {
            status: dto.status,
            service: dto.service,
            timestamp: dto.timestamp,
        }
    }
}
