//! Event loop: draws the UI, reads keys and runs one controller action at a time.

use crate::app::{AppAction, BUSY_STATUS, TuiApp};
use crate::terminal::TerminalGuard;
use crate::ui;
use advisor_application::{ChatController, SendOutcome};
use advisor_core::config::UiConfig;
use crossterm::event;
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of a background controller action, as a status line (if any).
type PendingOutcome = Option<String>;

pub async fn run(controller: ChatController, ui_config: &UiConfig) -> anyhow::Result<()> {
    let (mut terminal, mut guard) = TerminalGuard::enter()?;
    let mut app = TuiApp::new(ui_config);

    let mut pending: Option<JoinHandle<PendingOutcome>> = Some(spawn_action(
        controller.clone(),
        ActionRequest::Initialize,
    ));

    loop {
        if pending.as_ref().is_some_and(|handle| handle.is_finished()) {
            if let Some(finished) = pending.take() {
                match finished.await {
                    Ok(Some(status)) => app.status = Some(status),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!("[Runner] Background task failed: {}", e);
                        app.status = Some(format!("Background task failed: {}", e));
                    }
                }
            }
        }
        app.busy = pending.is_some();
        app.sync(controller.snapshot().await);

        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if !event::poll(POLL_INTERVAL)? {
            app.tick();
            continue;
        }

        let request = match app.handle_event(event::read()?) {
            AppAction::None => continue,
            AppAction::Quit => break,
            AppAction::Send(text) => ActionRequest::Send(text),
            AppAction::NewChat => ActionRequest::NewChat,
            AppAction::SelectSession(key) => ActionRequest::Select(key),
            AppAction::Archive(key) => ActionRequest::Archive(key),
            AppAction::Unarchive(key) => ActionRequest::Unarchive(key),
            AppAction::RefreshSessions => ActionRequest::Refresh,
            AppAction::ShowStats(key) => ActionRequest::Stats(key),
        };
        if pending.is_some() {
            app.status = Some(BUSY_STATUS.to_string());
            continue;
        }
        pending = Some(spawn_action(controller.clone(), request));
    }

    terminal.show_cursor()?;
    drop(terminal);
    guard.restore();
    Ok(())
}

#[derive(Debug)]
enum ActionRequest {
    Initialize,
    Send(String),
    NewChat,
    Select(String),
    Archive(String),
    Unarchive(String),
    Refresh,
    Stats(String),
}

fn spawn_action(controller: ChatController, request: ActionRequest) -> JoinHandle<PendingOutcome> {
    tokio::spawn(async move {
        tracing::debug!("[Runner] Running {:?}", request);
        match request {
            ActionRequest::Initialize => {
                controller.initialize().await;
                None
            }
            ActionRequest::Send(text) => match controller.send_message(&text).await {
                SendOutcome::Skipped => Some(BUSY_STATUS.to_string()),
                SendOutcome::Replied | SendOutcome::Failed => None,
            },
            ActionRequest::NewChat => {
                controller.new_chat().await;
                None
            }
            ActionRequest::Select(key) => {
                controller.select_session(&key).await;
                None
            }
            ActionRequest::Archive(key) => {
                controller
                    .archive_session(&key)
                    .await
                    .then(|| "Chat archived".to_string())
            }
            ActionRequest::Unarchive(key) => {
                controller
                    .unarchive_session(&key)
                    .await
                    .then(|| "Chat restored".to_string())
            }
            ActionRequest::Refresh => {
                controller.refresh_sessions().await;
                None
            }
            ActionRequest::Stats(key) => Some(stats_status(&controller, &key).await),
        }
    })
}

async fn stats_status(controller: &ChatController, session_key: &str) -> String {
    match controller.session_stats(session_key).await {
        Ok(Some(stats)) => format!(
            "{} messages ({} you / {} advisor) · {} characters · {} · last active {}",
            stats.total_messages,
            stats.user_messages,
            stats.ai_messages,
            stats.total_characters,
            stats.duration_label(),
            stats.last_activity
        ),
        Ok(None) => "No statistics for this chat".to_string(),
        Err(_) => "Failed to load chat statistics".to_string(),
    }
}
