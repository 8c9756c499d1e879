//! Message State Store - the transcript of the open session.

use crate::chat_client::ChatClient;
use advisor_core::session::{ChatMessage, display_time};
use chrono::Local;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

pub const SEND_FAILED_ERROR: &str = "Failed to send message. Please try again.";
/// Assistant-authored entry appended when a send fails.
pub const SEND_FAILED_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";
pub const NEW_CHAT_FAILED_ERROR: &str = "Failed to start new chat";
pub const LOAD_HISTORY_FAILED_ERROR: &str = "Failed to load chat history";

/// Observable state of the transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageState {
    /// Transcript in display order.
    pub messages: Vec<ChatMessage>,
    /// `true` while a send, new chat or session load is in flight.
    pub is_loading: bool,
    /// Human-readable error of the last failed operation.
    pub error: Option<String>,
    /// Key of the session the transcript belongs to.
    pub current_session_key: Option<String>,
}

/// Result of [`MessageStore::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank text or a send already in flight; nothing was sent.
    Skipped,
    /// The assistant reply was appended.
    Replied,
    /// The send failed; the apology entry was appended.
    Failed,
}

/// Holds the transcript of the active session and drives the client for it.
///
/// Operations never hold the state lock across a backend call, so readers
/// always see a consistent snapshot.
#[derive(Clone)]
pub struct MessageStore {
    client: ChatClient,
    state: Arc<RwLock<MessageState>>,
    initialized: Arc<AtomicBool>,
}

impl MessageStore {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(MessageState::default())),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> MessageState {
        self.state.read().await.clone()
    }

    pub async fn current_session_key(&self) -> Option<String> {
        self.state.read().await.current_session_key.clone()
    }

    /// Loads the backend's current transcript when no session is active.
    ///
    /// Only the first call has any effect.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.state.read().await.current_session_key.is_some() {
            return;
        }
        tracing::info!("[MessageStore] Loading initial chat history");

        match self.client.get_chat_history().await {
            Ok(transcript) => {
                let mut state = self.state.write().await;
                state.messages = transcript.messages;
                state.current_session_key = Some(transcript.session_key);
            }
            Err(e) => {
                tracing::warn!("[MessageStore] Initial history load failed: {}", e);
                self.state.write().await.error = Some(LOAD_HISTORY_FAILED_ERROR.to_string());
            }
        }
    }

    /// Sends `text` to the active session.
    ///
    /// Blank text and sends issued while another is in flight are skipped
    /// without contacting the backend. Otherwise the user entry is appended
    /// immediately, followed by either the reply or an apology entry.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Skipped;
        }
        {
            let mut state = self.state.write().await;
            if state.is_loading {
                tracing::debug!("[MessageStore] Send skipped, request in flight");
                return SendOutcome::Skipped;
            }
            state
                .messages
                .push(ChatMessage::user(text, display_time(Local::now())));
            state.is_loading = true;
            state.error = None;
        }

        let result = self.client.send_message(text).await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(reply) => {
                state
                    .messages
                    .push(ChatMessage::assistant(reply.response, reply.timestamp));
                state.current_session_key = Some(reply.session_key);
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::warn!("[MessageStore] Send failed: {}", e);
                state.error = Some(SEND_FAILED_ERROR.to_string());
                state.messages.push(ChatMessage::assistant(
                    SEND_FAILED_APOLOGY,
                    display_time(Local::now()),
                ));
                SendOutcome::Failed
            }
        }
    }

    /// Starts a new chat: empty transcript under a fresh key.
    ///
    /// Returns `false` when the backend refused; the transcript is kept.
    pub async fn start_new_chat(&self) -> bool {
        self.state.write().await.is_loading = true;

        let result = self.client.start_new_chat().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(new_chat) => {
                tracing::info!("[MessageStore] Started new chat {}", new_chat.session_key);
                state.messages.clear();
                state.error = None;
                state.current_session_key = Some(new_chat.session_key);
                true
            }
            Err(e) => {
                tracing::warn!("[MessageStore] New chat failed: {}", e);
                state.error = Some(NEW_CHAT_FAILED_ERROR.to_string());
                false
            }
        }
    }

    /// Replaces the transcript with the one of `session_key`.
    pub async fn load_chat_session(&self, session_key: &str) -> bool {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = self.client.load_chat_session(session_key).await;

        let restore = {
            let mut state = self.state.write().await;
            state.is_loading = false;
            match result {
                Ok(transcript) => {
                    state.messages = transcript.messages;
                    state.current_session_key = Some(session_key.to_string());
                    return true;
                }
                Err(e) => {
                    tracing::warn!("[MessageStore] Loading {} failed: {}", session_key, e);
                    state.error = Some(LOAD_HISTORY_FAILED_ERROR.to_string());
                    state.current_session_key.clone()
                }
            }
        };

        // The transcript on screen still belongs to the previous session; so must the next send.
        let tracker = self.client.tracker();
        match restore {
            Some(key) => tracker.set(key).await,
            None => tracker.clear().await,
        }
        false
    }
}
