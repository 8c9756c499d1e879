//! HttpChatBackend - REST implementation of `ChatBackend`.
//!
//! Talks to the AdvisorOP backend's `/api/chat/...` endpoints. Credentials are
//! ambient: the client keeps a cookie store so the backend's session cookie
//! travels with every request. Each call is a single attempt.

use crate::dto::{
    ArchiveAction, ArchiveRequest, ChatHistoryResponse, ChatResponse, HealthResponse,
    NewChatRequest, NewChatResponse, SendMessageRequest, SessionListResponse,
};
use advisor_core::config::ServerConfig;
use advisor_core::error::{AdvisorError, Result};
use advisor_core::session::{
    ChatBackend, ChatReply, ChatTranscript, HealthStatus, NewChat, SessionListing, SessionStats,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// `ChatBackend` over HTTP.
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    client: Client,
    base_url: Url,
}

impl HttpChatBackend {
    /// Creates a backend for `base_url` (the origin, without `/api`).
    ///
    /// # Errors
    ///
    /// Returns a config error when the URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| AdvisorError::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AdvisorError::config(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AdvisorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Creates a backend from the `[server]` section of the config.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs.map(Duration::from_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `<base>/<segments...>/` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AdvisorError::config("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    /// Sends a request and rejects non-success statuses.
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            };
            return Err(AdvisorError::http(status.as_u16(), message));
        }

        Ok(response)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(|e| AdvisorError::Serialization {
            format: "JSON".to_string(),
            message: e.to_string(),
        })
    }

    async fn get_history(&self, session_key: Option<&str>) -> Result<ChatTranscript> {
        let url = self.endpoint(&["api", "chat"])?;
        let mut request = self.client.get(url);
        if let Some(key) = session_key {
            request = request.query(&[("session_key", key)]);
        }
        tracing::debug!(session_key = ?session_key, "GET chat history");
        let dto: ChatHistoryResponse = self.execute_json(request).await?;
        Ok(dto.into())
    }

    async fn post_message(&self, message: &str, session_key: Option<&str>) -> Result<ChatReply> {
        let url = self.endpoint(&["api", "chat"])?;
        let body = SendMessageRequest {
            message,
            session_key,
        };
        tracing::debug!(session_key = ?session_key, chars = message.len(), "POST chat message");
        let dto: ChatResponse = self.execute_json(self.client.post(url).json(&body)).await?;
        Ok(dto.into())
    }

    async fn post_new_chat(&self, previous_key: Option<&str>) -> Result<NewChat> {
        let url = self.endpoint(&["api", "chat", "new"])?;
        let body = NewChatRequest {
            session_key: previous_key,
        };
        tracing::debug!(previous_key = ?previous_key, "POST new chat");
        let dto: NewChatResponse = self.execute_json(self.client.post(url).json(&body)).await?;
        Ok(dto.into())
    }

    async fn get_sessions(&self) -> Result<SessionListing> {
        let url = self.endpoint(&["api", "chat", "history"])?;
        tracing::debug!("GET chat sessions");
        let dto: SessionListResponse = self.execute_json(self.client.get(url)).await?;
        Ok(dto.into())
    }

    async fn post_archive(&self, session_key: &str, action: ArchiveAction) -> Result<()> {
        let url = self.endpoint(&["api", "chat", "archive", session_key])?;
        tracing::debug!(session_key, ?action, "POST archive");
        self.execute(self.client.post(url).json(&ArchiveRequest { action }))
            .await?;
        Ok(())
    }

    async fn get_stats(&self, session_key: &str) -> Result<Option<SessionStats>> {
        let url = self.endpoint(&["api", "chat", "stats", session_key])?;
        match self.execute_json::<SessionStats>(self.client.get(url)).await {
            Ok(stats) => Ok(Some(stats)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_health(&self) -> Result<HealthStatus> {
        let url = self.endpoint(&["api", "health"])?;
        let dto: HealthResponse = self.execute_json(self.client.get(url)).await?;
        Ok(dto.into())
    }
}

/// Logs a failed call at the client boundary and passes the result through.
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::error!("Error {}: {}", operation, e);
    }
    result
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn fetch_history(&self, session_key: Option<&str>) -> Result<ChatTranscript> {
        logged("getting chat history", self.get_history(session_key).await)
    }

    async fn send_message(&self, message: &str, session_key: Option<&str>) -> Result<ChatReply> {
        logged("sending message", self.post_message(message, session_key).await)
    }

    async fn start_new_chat(&self, previous_key: Option<&str>) -> Result<NewChat> {
        logged("starting new chat", self.post_new_chat(previous_key).await)
    }

    async fn list_sessions(&self) -> Result<SessionListing> {
        logged("getting chat sessions", self.get_sessions().await)
    }

    async fn set_archived(&self, session_key: &str, archived: bool) -> Result<()> {
        let action = ArchiveAction::from_flag(archived);
        let operation = match action {
            ArchiveAction::Archive => "archiving session",
            ArchiveAction::Unarchive => "unarchiving session",
        };
        logged(operation, self.post_archive(session_key, action).await)
    }

    async fn session_stats(&self, session_key: &str) -> Result<Option<SessionStats>> {
        logged("getting session stats", self.get_stats(session_key).await)
    }

    async fn health(&self) -> Result<HealthStatus> {
        logged("checking backend health", self.get_health().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let backend = HttpChatBackend::new("http://127.0.0.1:8000", None).unwrap();

        assert_eq!(
            backend.endpoint(&["api", "chat"]).unwrap().as_str(),
            "http://127.0.0.1:8000/api/chat/"
        );
        assert_eq!(
            backend
                .endpoint(&["api", "chat", "archive", "abc-123"])
                .unwrap()
                .as_str(),
            "http://127.0.0.1:8000/api/chat/archive/abc-123/"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_keys() {
        let backend = HttpChatBackend::new("https://example.com/advisor/", None).unwrap();

        assert_eq!(
            backend.endpoint(&["api", "chat", "stats", "a b/c"]).unwrap().as_str(),
            "https://example.com/advisor/api/chat/stats/a%20b%2Fc/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpChatBackend::new("not a url", None).unwrap_err();
        assert!(err.is_config());

        let err = HttpChatBackend::new("mailto:someone@example.com", None).unwrap_err();
        assert!(err.is_config());
    }
}
