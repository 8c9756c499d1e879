//! HttpChatBackend integration tests against an in-process fake backend.

use advisor_core::session::ChatBackend;
use advisor_infrastructure::HttpChatBackend;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeState {
    sent: Mutex<Vec<Value>>,
    new_chat_bodies: Mutex<Vec<Value>>,
    archive_calls: Mutex<Vec<(String, Value)>>,
    history_cookies: Mutex<Vec<Option<String>>>,
}

async fn history(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.history_cookies.lock().unwrap().push(cookie);

    match query.get("session_key") {
        Some(key) => Json(json!({
            "messages": [
                { "text": "I feel stuck", "is_user": true, "timestamp": "09:00" },
                { "text": "<p>Tell me <b>more</b></p>", "is_user": false, "timestamp": "09:01" }
            ],
            "session_key": key
        })),
        None => Json(json!({
            "messages": [],
            "session_key": uuid::Uuid::new_v4().to_string()
        })),
    }
}

async fn send(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.sent.lock().unwrap().push(body.clone());
    if body["message"] == "explode" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": "model unavailable" })),
        )
            .into_response();
    }
    let key = body["session_key"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| "created-by-server".to_string());
    Json(json!({
        "response": format!("echo: {}", body["message"].as_str().unwrap_or_default()),
        "timestamp": "12:00",
        "session_key": key,
        "message_id": 42,
        "success": true
    }))
    .into_response()
}

async fn new_chat(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Json<Value> {
    state.new_chat_bodies.lock().unwrap().push(body);
    Json(json!({
        "status": "success",
        "message": "New chat started",
        "session_key": uuid::Uuid::new_v4().to_string()
    }))
}

async fn list() -> Json<Value> {
    Json(json!({
        "sessions": [
            {
                "session_key": "s1",
                "title": "Sleep trouble",
                "created_at": "2025-08-01T10:00:00+00:00",
                "updated_at": "2025-08-02T10:00:00+00:00",
                "is_archived": false,
                "message_count": 4
            },
            {
                "session_key": "s2",
                "title": "Work stress",
                "created_at": "2025-07-01T10:00:00+00:00",
                "updated_at": "2025-07-02T10:00:00+00:00",
                "is_archived": true,
                "message_count": 10
            }
        ],
        "user_id": "user-1"
    }))
}

async fn archive(
    State(state): State<Arc<FakeState>>,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.archive_calls.lock().unwrap().push((key.clone(), body));
    if key == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Failed to archive session" })),
        )
            .into_response();
    }
    Json(json!({ "status": "success", "message": "ok" })).into_response()
}

async fn stats(Path(key): Path<String>) -> Response {
    if key != "s1" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Session not found" })))
            .into_response();
    }
    Json(json!({
        "total_messages": 4,
        "user_messages": 2,
        "ai_messages": 2,
        "total_characters": 311,
        "session_duration": 3720.5,
        "last_activity": "2025-08-02T10:00:00+00:00"
    }))
    .into_response()
}

async fn health() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "sessionid=abc123; Path=/")],
        Json(json!({
            "status": "healthy",
            "service": "AI Chat Backend",
            "timestamp": "2025-08-03T00:00:00Z"
        })),
    )
}

async fn spawn_backend() -> (Arc<FakeState>, HttpChatBackend) {
    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route("/api/chat/", get(history).post(send))
        .route("/api/chat/new/", post(new_chat))
        .route("/api/chat/history/", get(list))
        .route("/api/chat/archive/:key/", post(archive))
        .route("/api/chat/stats/:key/", get(stats))
        .route("/api/health/", get(health))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = HttpChatBackend::new(&format!("http://{}", addr), None).unwrap();
    (state, backend)
}

#[tokio::test]
async fn test_fetch_history_with_and_without_key() {
    let (_state, backend) = spawn_backend().await;

    let fresh = backend.fetch_history(None).await.unwrap();
    assert!(fresh.messages.is_empty());
    assert!(!fresh.session_key.is_empty());

    let existing = backend.fetch_history(Some("s1")).await.unwrap();
    assert_eq!(existing.session_key, "s1");
    assert_eq!(existing.messages.len(), 2);
    assert!(existing.messages[0].is_user);
    assert!(!existing.messages[1].is_user);
}

#[tokio::test]
async fn test_send_message_posts_null_key_and_reads_reply() {
    let (state, backend) = spawn_backend().await;

    let reply = backend.send_message("hello", None).await.unwrap();
    assert_eq!(reply.response, "echo: hello");
    assert_eq!(reply.session_key, "created-by-server");
    assert_eq!(reply.message_id, Some(42));

    let reply = backend.send_message("again", Some("s1")).await.unwrap();
    assert_eq!(reply.session_key, "s1");

    let sent = state.sent.lock().unwrap();
    assert_eq!(sent[0], json!({ "message": "hello", "session_key": null }));
    assert_eq!(sent[1], json!({ "message": "again", "session_key": "s1" }));
}

#[tokio::test]
async fn test_server_error_becomes_http_error() {
    let (_state, backend) = spawn_backend().await;

    let err = backend.send_message("explode", None).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_start_new_chat_sends_previous_key() {
    let (state, backend) = spawn_backend().await;

    let first = backend.start_new_chat(None).await.unwrap();
    let second = backend.start_new_chat(Some(&first.session_key)).await.unwrap();

    assert_eq!(first.status, "success");
    assert_ne!(first.session_key, second.session_key);
    let bodies = state.new_chat_bodies.lock().unwrap();
    assert_eq!(bodies[0], json!({ "session_key": null }));
    assert_eq!(bodies[1], json!({ "session_key": first.session_key }));
}

#[tokio::test]
async fn test_list_sessions() {
    let (_state, backend) = spawn_backend().await;

    let listing = backend.list_sessions().await.unwrap();
    assert_eq!(listing.user_id, "user-1");
    assert_eq!(listing.sessions.len(), 2);
    assert!(listing.sessions[1].is_archived);
}

#[tokio::test]
async fn test_archive_and_unarchive_bodies() {
    let (state, backend) = spawn_backend().await;

    backend.set_archived("s1", true).await.unwrap();
    backend.set_archived("s1", false).await.unwrap();
    let err = backend.set_archived("missing", true).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let calls = state.archive_calls.lock().unwrap();
    assert_eq!(calls[0], ("s1".to_string(), json!({ "action": "archive" })));
    assert_eq!(calls[1], ("s1".to_string(), json!({ "action": "unarchive" })));
}

#[tokio::test]
async fn test_session_stats_found_and_missing() {
    let (_state, backend) = spawn_backend().await;

    let stats = backend.session_stats("s1").await.unwrap().unwrap();
    assert_eq!(stats.total_messages, 4);
    assert_eq!(stats.duration_label(), "1h 02m");

    assert!(backend.session_stats("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_cookie_from_backend_is_sent_back() {
    let (state, backend) = spawn_backend().await;

    let health = backend.health().await.unwrap();
    assert!(health.is_healthy());

    backend.fetch_history(None).await.unwrap();
    let cookies = state.history_cookies.lock().unwrap();
    assert_eq!(cookies[0].as_deref(), Some("sessionid=abc123"));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpChatBackend::new(&format!("http://{}", addr), None).unwrap();
    let err = backend.list_sessions().await.unwrap_err();
    assert!(err.is_network());
}
