//! Session List Store - the sidebar's view of every session.

use crate::chat_client::ChatClient;
use advisor_core::session::{ChatSession, partition_sessions};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

pub const LOAD_SESSIONS_FAILED_ERROR: &str = "Failed to load chat sessions";
pub const ARCHIVE_FAILED_ERROR: &str = "Failed to archive session";
pub const UNARCHIVE_FAILED_ERROR: &str = "Failed to unarchive session";

/// Observable state of the session list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionListState {
    /// Sessions in backend order, unique by key.
    pub sessions: Vec<ChatSession>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl SessionListState {
    /// Sessions that are not archived.
    pub fn active_sessions(&self) -> Vec<ChatSession> {
        partition_sessions(&self.sessions).0
    }

    pub fn archived_sessions(&self) -> Vec<ChatSession> {
        partition_sessions(&self.sessions).1
    }

    pub fn find(&self, session_key: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.session_key == session_key)
    }
}

/// Holds the list of sessions and applies archive state changes to it.
#[derive(Clone)]
pub struct SessionListStore {
    client: ChatClient,
    state: Arc<RwLock<SessionListState>>,
    initialized: Arc<AtomicBool>,
}

impl SessionListStore {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(SessionListState::default())),
            initialized: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn snapshot(&self) -> SessionListState {
        self.state.read().await.clone()
    }

    pub async fn active_sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.active_sessions()
    }

    pub async fn archived_sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.archived_sessions()
    }

    /// Loads the session list on first use; later calls do nothing.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        self.load_sessions().await;
    }

    /// Replaces the whole collection with a fresh listing.
    ///
    /// On failure the previous collection is kept and the error is set.
    pub async fn load_sessions(&self) -> bool {
        {
            let mut state = self.state.write().await;
            state.is_loading = true;
            state.error = None;
        }

        let result = self.client.get_chat_sessions().await;

        let mut state = self.state.write().await;
        state.is_loading = false;
        match result {
            Ok(listing) => {
                let mut seen = HashSet::new();
                state.sessions = listing
                    .sessions
                    .into_iter()
                    .filter(|s| seen.insert(s.session_key.clone()))
                    .collect();
                tracing::debug!("[SessionListStore] Loaded {} sessions", state.sessions.len());
                true
            }
            Err(e) => {
                tracing::warn!("[SessionListStore] Loading sessions failed: {}", e);
                state.error = Some(LOAD_SESSIONS_FAILED_ERROR.to_string());
                false
            }
        }
    }

    /// Archives a session, then marks the matching record archived.
    pub async fn archive_session(&self, session_key: &str) -> bool {
        let result = self.client.archive_session(session_key).await;
        self.apply_archive(session_key, true, result.is_ok(), ARCHIVE_FAILED_ERROR)
            .await
    }

    pub async fn unarchive_session(&self, session_key: &str) -> bool {
        let result = self.client.unarchive_session(session_key).await;
        self.apply_archive(session_key, false, result.is_ok(), UNARCHIVE_FAILED_ERROR)
            .await
    }

    async fn apply_archive(
        &self,
        session_key: &str,
        archived: bool,
        succeeded: bool,
        failure: &str,
    ) -> bool {
        let mut state = self.state.write().await;
        if !succeeded {
            state.error = Some(failure.to_string());
            return false;
        }
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.session_key == session_key)
        {
            session.is_archived = archived;
        }
        true
    }

    /// Puts `session` at the top of the list, replacing a record with the
    /// same key.
    pub async fn add_new_session(&self, session: ChatSession) {
        let mut state = self.state.write().await;
        state.sessions.retain(|s| s.session_key != session.session_key);
        state.sessions.insert(0, session);
    }

    pub async fn update_session_title(&self, session_key: &str, title: impl Into<String>) {
        let mut state = self.state.write().await;
        if let Some(session) = state
            .sessions
            .iter_mut()
            .find(|s| s.session_key == session_key)
        {
            session.title = title.into();
        }
    }
}
