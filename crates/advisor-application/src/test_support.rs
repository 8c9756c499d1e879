//! In-memory `ChatBackend` for store and controller tests.

use advisor_core::error::{AdvisorError, Result};
use advisor_core::session::{
    ChatBackend, ChatMessage, ChatReply, ChatSession, ChatTranscript, HealthStatus, NewChat,
    SessionListing, SessionStats,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct MockState {
    sessions: Vec<ChatSession>,
    transcripts: HashMap<String, Vec<ChatMessage>>,
    calls: Vec<String>,
    next_key: u32,
    fail_send: bool,
    fail_new_chat: bool,
    fail_history: bool,
    fail_list: bool,
    fail_archive: bool,
}

impl MockState {
    fn fresh_key(&mut self) -> String {
        self.next_key += 1;
        format!("session-{}", self.next_key)
    }
}

/// Mock backend that behaves like the real service: unknown keys yield empty
/// transcripts, sending without a key creates a listed session, and every
/// new chat gets a fresh key.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    send_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with one session holding a two-message transcript.
    pub fn with_session(key: &str, title: &str, archived: bool) -> Self {
        let backend = Self::new();
        backend.add_session(key, title, archived);
        backend
    }

    pub fn add_session(&self, key: &str, title: &str, archived: bool) {
        let mut state = self.state.lock().unwrap();
        state.sessions.push(ChatSession {
            session_key: key.to_string(),
            title: title.to_string(),
            created_at: "2025-08-01T10:00:00+00:00".to_string(),
            updated_at: "2025-08-01T10:05:00+00:00".to_string(),
            is_archived: archived,
            message_count: 2,
        });
        state.transcripts.insert(
            key.to_string(),
            vec![
                ChatMessage::user(format!("About {}", title), "10:00"),
                ChatMessage::assistant("<p>Tell me <b>more</b>.</p>", "10:01"),
            ],
        );
    }

    pub fn session(&self, key: &str) -> Option<ChatSession> {
        let state = self.state.lock().unwrap();
        state.sessions.iter().find(|s| s.session_key == key).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn fail_send(&self, fail: bool) {
        self.state.lock().unwrap().fail_send = fail;
    }

    pub fn fail_new_chat(&self, fail: bool) {
        self.state.lock().unwrap().fail_new_chat = fail;
    }

    pub fn fail_history(&self, fail: bool) {
        self.state.lock().unwrap().fail_history = fail;
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn fail_archive(&self, fail: bool) {
        self.state.lock().unwrap().fail_archive = fail;
    }

    /// Makes the next sends wait until the returned handle is notified.
    pub fn hold_sends(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.send_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn key_label(key: Option<&str>) -> String {
    key.unwrap_or("None").to_string()
}

#[async_trait::async_trait]
impl ChatBackend for MockBackend {
    async fn fetch_history(&self, session_key: Option<&str>) -> Result<ChatTranscript> {
        self.record(format!("fetch_history({})", key_label(session_key)));
        let mut state = self.state.lock().unwrap();
        if state.fail_history {
            return Err(AdvisorError::http(500, "history unavailable"));
        }
        match session_key {
            Some(key) => Ok(ChatTranscript {
                messages: state.transcripts.get(key).cloned().unwrap_or_default(),
                session_key: key.to_string(),
            }),
            None => Ok(ChatTranscript {
                messages: Vec::new(),
                session_key: state.fresh_key(),
            }),
        }
    }

    async fn send_message(&self, message: &str, session_key: Option<&str>) -> Result<ChatReply> {
        self.record(format!("send_message({})", key_label(session_key)));
        let gate = self.send_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        if state.fail_send {
            return Err(AdvisorError::http(500, "model unavailable"));
        }
        let key = match session_key {
            Some(key) => key.to_string(),
            None => state.fresh_key(),
        };
        if !state.sessions.iter().any(|s| s.session_key == key) {
            state.sessions.insert(
                0,
                ChatSession {
                    session_key: key.clone(),
                    title: message.chars().take(30).collect(),
                    created_at: "2025-08-02T09:00:00+00:00".to_string(),
                    updated_at: "2025-08-02T09:00:00+00:00".to_string(),
                    is_archived: false,
                    message_count: 0,
                },
            );
        }
        let response = format!("Echo: {}", message);
        let transcript = state.transcripts.entry(key.clone()).or_default();
        transcript.push(ChatMessage::user(message, "09:00"));
        transcript.push(ChatMessage::assistant(response.clone(), "09:00"));

        Ok(ChatReply {
            response,
            timestamp: "09:00".to_string(),
            session_key: key,
            message_id: None,
        })
    }

    async fn start_new_chat(&self, previous_key: Option<&str>) -> Result<NewChat> {
        self.record(format!("start_new_chat({})", key_label(previous_key)));
        let mut state = self.state.lock().unwrap();
        if state.fail_new_chat {
            return Err(AdvisorError::network("connection refused"));
        }
        Ok(NewChat {
            status: "success".to_string(),
            message: "New chat started".to_string(),
            session_key: state.fresh_key(),
        })
    }

    async fn list_sessions(&self) -> Result<SessionListing> {
        self.record("list_sessions".to_string());
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(AdvisorError::http(503, "unavailable"));
        }
        Ok(SessionListing {
            sessions: state.sessions.clone(),
            user_id: "user-1".to_string(),
        })
    }

    async fn set_archived(&self, session_key: &str, archived: bool) -> Result<()> {
        self.record(format!("set_archived({}, {})", session_key, archived));
        let mut state = self.state.lock().unwrap();
        if state.fail_archive {
            return Err(AdvisorError::http(500, "archive failed"));
        }
        match state.sessions.iter_mut().find(|s| s.session_key == session_key) {
            Some(session) => {
                session.is_archived = archived;
                Ok(())
            }
            None => Err(AdvisorError::http(404, "Session not found")),
        }
    }

    async fn session_stats(&self, session_key: &str) -> Result<Option<SessionStats>> {
        self.record(format!("session_stats({})", session_key));
        let state = self.state.lock().unwrap();
        Ok(state.transcripts.get(session_key).map(|messages| {
            let user_messages = messages.iter().filter(|m| m.is_user).count() as u32;
            SessionStats {
                total_messages: messages.len() as u32,
                user_messages,
                ai_messages: messages.len() as u32 - user_messages,
                total_characters: messages.iter().map(|m| m.text.len() as u64).sum(),
                session_duration: 300.0,
                last_activity: "2025-08-01T10:05:00+00:00".to_string(),
            }
        }))
    }

    async fn health(&self) -> Result<HealthStatus> {
        self.record("health".to_string());
        Ok(HealthStatus {
            status: "healthy".to_string(),
            service: "mock".to_string(),
            timestamp: "2025-08-01T10:00:00Z".to_string(),
        })
    }
}
