//! ChatController - keeps the transcript, the session list and the UI's
//! notion of the current session consistent.

use crate::chat_client::ChatClient;
use crate::message_store::{MessageStore, SendOutcome};
use crate::session_store::SessionListStore;
use advisor_core::error::Result;
use advisor_core::session::{ChatBackend, ChatMessage, ChatSession, SessionStats};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Everything a renderer needs, captured at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatViewState {
    pub messages: Vec<ChatMessage>,
    /// A message-store operation is in flight.
    pub is_loading: bool,
    pub error: Option<String>,
    pub active_sessions: Vec<ChatSession>,
    pub archived_sessions: Vec<ChatSession>,
    pub sessions_loading: bool,
    pub sessions_error: Option<String>,
    /// Session highlighted in the sidebar.
    pub current_session_key: Option<String>,
}

impl ChatViewState {
    pub fn is_current(&self, session_key: &str) -> bool {
        self.current_session_key.as_deref() == Some(session_key)
    }
}

/// Coordinates the two stores for a view.
///
/// Every message-store operation is followed by [`ChatController::reconcile`],
/// which refreshes the session list once the active session has messages (so
/// a session created by the first send shows up) and moves the current
/// session to the active key.
#[derive(Clone)]
pub struct ChatController {
    client: ChatClient,
    messages: MessageStore,
    sessions: SessionListStore,
    current_session_key: Arc<RwLock<Option<String>>>,
}

impl ChatController {
    /// Creates a controller whose client and stores share one session tracker.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let client = ChatClient::new(backend);
        Self {
            messages: MessageStore::new(client.clone()),
            sessions: SessionListStore::new(client.clone()),
            client,
            current_session_key: Arc::new(RwLock::new(None)),
        }
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn sessions(&self) -> &SessionListStore {
        &self.sessions
    }

    pub async fn current_session_key(&self) -> Option<String> {
        self.current_session_key.read().await.clone()
    }

    /// Loads the initial transcript and session list.
    pub async fn initialize(&self) {
        self.messages.initialize().await;
        self.sessions.initialize().await;
        self.reconcile().await;
    }

    /// Opens `session_key` and shows its transcript.
    pub async fn select_session(&self, session_key: &str) -> bool {
        tracing::info!("[ChatController] Selecting session {}", session_key);
        *self.current_session_key.write().await = Some(session_key.to_string());
        let loaded = self.messages.load_chat_session(session_key).await;
        self.reconcile().await;
        loaded
    }

    /// Starts a new chat and refreshes the session list.
    pub async fn new_chat(&self) -> bool {
        let started = self.messages.start_new_chat().await;
        self.sessions.load_sessions().await;
        self.reconcile().await;
        started
    }

    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let outcome = self.messages.send_message(text).await;
        if outcome != SendOutcome::Skipped {
            self.reconcile().await;
        }
        outcome
    }

    /// Archives `session_key`; leaving it for a new chat when it is open.
    pub async fn archive_session(&self, session_key: &str) -> bool {
        let archived = self.sessions.archive_session(session_key).await;
        if archived && self.current_session_key().await.as_deref() == Some(session_key) {
            tracing::info!("[ChatController] Archived the open session, starting a new chat");
            self.new_chat().await;
        }
        archived
    }

    pub async fn unarchive_session(&self, session_key: &str) -> bool {
        self.sessions.unarchive_session(session_key).await
    }

    pub async fn refresh_sessions(&self) -> bool {
        self.sessions.load_sessions().await
    }

    pub async fn session_stats(&self, session_key: &str) -> Result<Option<SessionStats>> {
        self.client.session_stats(session_key).await
    }

    /// Brings the session list and the current session in line with the
    /// message store.
    pub async fn reconcile(&self) {
        let state = self.messages.snapshot().await;
        let Some(active_key) = state.current_session_key else {
            return;
        };
        if !state.messages.is_empty() {
            self.sessions.load_sessions().await;
        }
        *self.current_session_key.write().await = Some(active_key);
    }

    pub async fn snapshot(&self) -> ChatViewState {
        let messages = self.messages.snapshot().await;
        let sessions = self.sessions.snapshot().await;
        ChatViewState {
            messages: messages.messages,
            is_loading: messages.is_loading,
            error: messages.error,
            active_sessions: sessions.active_sessions(),
            archived_sessions: sessions.archived_sessions(),
            sessions_loading: sessions.is_loading,
            sessions_error: sessions.error,
            current_session_key: self.current_session_key().await,
        }
    }
}
