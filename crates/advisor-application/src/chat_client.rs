//! ChatClient - session-aware facade over a `ChatBackend`.

use crate::session_tracker::SessionTracker;
use advisor_core::error::Result;
use advisor_core::session::{
    ChatBackend, ChatReply, ChatTranscript, HealthStatus, NewChat, SessionListing, SessionStats,
};
use std::sync::Arc;

/// Client of the remote chat service that remembers which session is open.
///
/// The backend is stateless with respect to sessions; this type supplies the
/// tracked key to every call that needs one and adopts the keys the backend
/// hands back. Components sharing the same [`SessionTracker`] see the same
/// key, so loading a session before sending changes which session receives
/// the message.
#[derive(Clone)]
pub struct ChatClient {
    backend: Arc<dyn ChatBackend>,
    tracker: SessionTracker,
}

impl ChatClient {
    /// Creates a client with its own tracker.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_tracker(backend, SessionTracker::new())
    }

    /// Creates a client bound to an existing tracker.
    pub fn with_tracker(backend: Arc<dyn ChatBackend>, tracker: SessionTracker) -> Self {
        Self { backend, tracker }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Returns the tracked session key.
    pub async fn current_session_key(&self) -> Option<String> {
        self.tracker.current().await
    }

    /// Fetches the transcript of the tracked session, or of the backend's
    /// current session when none is tracked, and tracks the returned key.
    pub async fn get_chat_history(&self) -> Result<ChatTranscript> {
        let key = self.tracker.current().await;
        let transcript = self.backend.fetch_history(key.as_deref()).await?;
        self.tracker.set(transcript.session_key.clone()).await;
        Ok(transcript)
    }

    /// Tracks `session_key`, then fetches its transcript.
    ///
    /// The key stays tracked even when the fetch fails.
    pub async fn load_chat_session(&self, session_key: &str) -> Result<ChatTranscript> {
        self.tracker.set(session_key).await;
        self.backend.fetch_history(Some(session_key)).await
    }

    /// Sends `message` to the tracked session (the backend creates one when
    /// none is tracked) and tracks the session that received it.
    pub async fn send_message(&self, message: &str) -> Result<ChatReply> {
        let key = self.tracker.current().await;
        let reply = self.backend.send_message(message, key.as_deref()).await?;
        self.tracker.set(reply.session_key.clone()).await;
        Ok(reply)
    }

    /// Starts a new chat, passing the tracked key as the session being left.
    pub async fn start_new_chat(&self) -> Result<NewChat> {
        let previous = self.tracker.current().await;
        let new_chat = self.backend.start_new_chat(previous.as_deref()).await?;
        self.tracker.set(new_chat.session_key.clone()).await;
        Ok(new_chat)
    }

    pub async fn get_chat_sessions(&self) -> Result<SessionListing> {
        self.backend.list_sessions().await
    }

    pub async fn archive_session(&self, session_key: &str) -> Result<()> {
        self.backend.set_archived(session_key, true).await
    }

    pub async fn unarchive_session(&self, session_key: &str) -> Result<()> {
        self.backend.set_archived(session_key, false).await
    }

    /// Statistics of a session; `None` when the backend does not know it.
    pub async fn session_stats(&self, session_key: &str) -> Result<Option<SessionStats>> {
        self.backend.session_stats(session_key).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.backend.health().await
    }
}
