use crate::controller::ChatController;
use crate::message_store::{SEND_FAILED_APOLOGY, SendOutcome};
use crate::test_support::MockBackend;
use std::sync::Arc;

fn controller_with(backend: Arc<MockBackend>) -> ChatController {
    ChatController::new(backend)
}

#[tokio::test]
async fn test_initialize_loads_history_and_sessions() {
    let backend = Arc::new(MockBackend::with_session("s1", "Sleep", false));
    let controller = controller_with(backend.clone());

    controller.initialize().await;

    let view = controller.snapshot().await;
    assert!(view.messages.is_empty());
    assert_eq!(view.active_sessions.len(), 1);
    // Empty transcript: the key is adopted without another listing
    assert_eq!(view.current_session_key.as_deref(), Some("session-1"));
    assert_eq!(backend.count_calls("list_sessions"), 1);
}

#[tokio::test]
async fn test_first_send_lists_created_session() {
    let backend = Arc::new(MockBackend::new());
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    let key = controller.current_session_key().await.unwrap();

    assert_eq!(controller.send_message("hello").await, SendOutcome::Replied);

    let view = controller.snapshot().await;
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.current_session_key.as_deref(), Some(key.as_str()));
    assert!(view.is_current(&key));
    assert_eq!(view.active_sessions.len(), 1);
    assert_eq!(view.active_sessions[0].session_key, key);
}

#[tokio::test]
async fn test_skipped_send_does_not_reconcile() {
    let backend = Arc::new(MockBackend::new());
    let controller = controller_with(backend.clone());

    assert_eq!(controller.send_message("  ").await, SendOutcome::Skipped);

    assert!(backend.calls().is_empty());
    assert_eq!(controller.current_session_key().await, None);
}

#[tokio::test]
async fn test_failed_send_shows_apology() {
    let backend = Arc::new(MockBackend::new());
    backend.fail_send(true);
    let controller = controller_with(backend);
    controller.initialize().await;

    assert_eq!(controller.send_message("hello").await, SendOutcome::Failed);

    let view = controller.snapshot().await;
    assert_eq!(view.messages.len(), 2);
    assert_eq!(view.messages[1].text, SEND_FAILED_APOLOGY);
    assert!(view.error.is_some());
}

#[tokio::test]
async fn test_select_session_loads_transcript() {
    let backend = Arc::new(MockBackend::new());
    backend.add_session("s1", "Sleep", false);
    backend.add_session("s2", "Work", false);
    let controller = controller_with(backend.clone());
    controller.initialize().await;

    assert!(controller.select_session("s2").await);

    let view = controller.snapshot().await;
    assert_eq!(view.current_session_key.as_deref(), Some("s2"));
    assert_eq!(view.messages[0].text, "About Work");
    assert_eq!(
        controller.client().current_session_key().await.as_deref(),
        Some("s2")
    );

    // The next message goes to the selected session
    controller.send_message("more").await;
    assert!(backend.calls().contains(&"send_message(s2)".to_string()));
}

#[tokio::test]
async fn test_failed_select_keeps_sending_to_shown_session() {
    let backend = Arc::new(MockBackend::new());
    backend.add_session("s1", "Sleep", false);
    backend.add_session("s2", "Work", false);
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    assert!(controller.select_session("s1").await);

    backend.fail_history(true);
    assert!(!controller.select_session("s2").await);

    let view = controller.snapshot().await;
    assert_eq!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(
        controller.client().current_session_key().await.as_deref(),
        Some("s1")
    );

    backend.clear_calls();
    assert_eq!(controller.send_message("for sleep").await, SendOutcome::Replied);

    assert!(backend.calls().contains(&"send_message(s1)".to_string()));
    assert_eq!(backend.count_calls("send_message(s2)"), 0);
    let view = controller.snapshot().await;
    assert_eq!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(view.messages[0].text, "About Sleep");
    assert_eq!(view.messages.last().unwrap().text, "Echo: for sleep");
}

#[tokio::test]
async fn test_new_chat_yields_empty_transcript_and_fresh_key() {
    let backend = Arc::new(MockBackend::with_session("s1", "Sleep", false));
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    controller.select_session("s1").await;
    backend.clear_calls();

    assert!(controller.new_chat().await);

    let view = controller.snapshot().await;
    assert!(view.messages.is_empty());
    assert!(view.current_session_key.is_some());
    assert_ne!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(backend.count_calls("list_sessions"), 1);
}

#[tokio::test]
async fn test_archiving_open_session_starts_new_chat() {
    let backend = Arc::new(MockBackend::new());
    backend.add_session("s1", "Sleep", false);
    backend.add_session("s2", "Work", false);
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    controller.select_session("s1").await;

    assert!(controller.archive_session("s1").await);

    let view = controller.snapshot().await;
    assert!(view.messages.is_empty());
    assert_ne!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(view.archived_sessions.len(), 1);
    assert_eq!(view.archived_sessions[0].session_key, "s1");
    assert!(view.active_sessions.iter().all(|s| s.session_key != "s1"));
}

#[tokio::test]
async fn test_archiving_other_session_keeps_transcript() {
    let backend = Arc::new(MockBackend::new());
    backend.add_session("s1", "Sleep", false);
    backend.add_session("s2", "Work", false);
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    controller.select_session("s1").await;
    backend.clear_calls();

    assert!(controller.archive_session("s2").await);

    let view = controller.snapshot().await;
    assert_eq!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(view.messages.len(), 2);
    assert_eq!(backend.count_calls("start_new_chat"), 0);
}

#[tokio::test]
async fn test_failed_archive_of_open_session_stays() {
    let backend = Arc::new(MockBackend::with_session("s1", "Sleep", false));
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    controller.select_session("s1").await;
    backend.fail_archive(true);

    assert!(!controller.archive_session("s1").await);

    let view = controller.snapshot().await;
    assert_eq!(view.current_session_key.as_deref(), Some("s1"));
    assert_eq!(view.messages.len(), 2);
    assert!(view.sessions_error.is_some());
}

#[tokio::test]
async fn test_unarchive_and_refresh() {
    let backend = Arc::new(MockBackend::with_session("s1", "Sleep", true));
    let controller = controller_with(backend.clone());
    controller.initialize().await;
    assert_eq!(controller.snapshot().await.archived_sessions.len(), 1);

    assert!(controller.unarchive_session("s1").await);
    assert_eq!(controller.snapshot().await.active_sessions.len(), 1);

    backend.add_session("s2", "Work", false);
    assert!(controller.refresh_sessions().await);
    assert_eq!(controller.snapshot().await.active_sessions.len(), 2);
}

#[tokio::test]
async fn test_session_stats() {
    let backend = Arc::new(MockBackend::with_session("s1", "Sleep", false));
    let controller = controller_with(backend);

    let stats = controller.session_stats("s1").await.unwrap().unwrap();
    assert_eq!(stats.total_messages, 2);
    assert_eq!(stats.user_messages, 1);
    assert!(controller.session_stats("nope").await.unwrap().is_none());
}
