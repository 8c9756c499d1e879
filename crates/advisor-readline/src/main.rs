//! `advisor-repl` - line-oriented AdvisorOP client.

mod command;
mod helper;
mod render;

use advisor_application::{ChatController, ChatViewState, SendOutcome};
use advisor_core::session::ChatSession;
use advisor_infrastructure::config_service::LOG_LEVEL_ENV;
use advisor_infrastructure::{AdvisorPaths, ConfigService, HttpChatBackend};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use command::{Command, Target};
use helper::CliHelper;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_REPL_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "advisor-repl")]
#[command(about = "AdvisorOP - line-mode chat client", long_about = None)]
#[command(version)]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory holding config.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Log filter directive written to stderr (overrides RUST_LOG and ADVISOR_LOG)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

/// `--log-level`, then `RUST_LOG`, then `ADVISOR_LOG`, then `warn`.
///
/// stdout belongs to the conversation, so the file's level only applies when
/// `ADVISOR_LOG` asks for it.
fn log_directive(cli: Option<&str>, rust_log: Option<&str>, configured: Option<&str>) -> String {
    [cli, rust_log, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(DEFAULT_REPL_LOG_LEVEL)
        .to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let paths = AdvisorPaths::new(args.config_dir);
    let config_service = ConfigService::new(&paths)?;
    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to read {}", config_service.path().display()))?;
    if let Some(base_url) = args.base_url {
        config.server.base_url = base_url;
    }

    let configured = std::env::var_os(LOG_LEVEL_ENV)
        .is_some()
        .then_some(config.logging.level.as_str());
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log_directive(args.log_level.as_deref(), rust_log.as_deref(), configured);
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_REPL_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "[Startup] AdvisorOP REPL {} using {}",
        env!("CARGO_PKG_VERSION"),
        config.server.base_url
    );

    let backend = Arc::new(HttpChatBackend::from_config(&config.server)?);
    let controller = ChatController::new(backend);
    controller.initialize().await;

    println!("{}", render::banner());
    println!();

    let mut repl = Repl::new(controller);
    repl.print_transcript().await;

    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let command = command::parse(&line);
                if command == Command::Empty {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                if !repl.handle(command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

struct Repl {
    controller: ChatController,
    /// Keys of the last printed listing, in display order.
    last_listing: Vec<String>,
}

impl Repl {
    fn new(controller: ChatController) -> Self {
        Self {
            controller,
            last_listing: Vec::new(),
        }
    }

    /// Runs one command. Returns false when the REPL should exit.
    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Empty => {}
            Command::Quit => return false,
            Command::Help => println!("{}", command::HELP.bright_black()),
            Command::New => {
                if self.controller.new_chat().await {
                    println!("{}", "Started a new chat.".bright_green());
                    println!("{}", render::welcome());
                } else {
                    self.print_error().await;
                }
            }
            Command::Sessions => {
                let view = self.controller.snapshot().await;
                self.print_listing("Recent Chats", &view.active_sessions, &view)
            }
            Command::Archived => {
                let view = self.controller.snapshot().await;
                self.print_listing("Archived", &view.archived_sessions, &view)
            }
            Command::Open(target) => {
                let Some(key) = self.resolve(&target) else {
                    return true;
                };
                if self.controller.select_session(&key).await {
                    self.print_transcript().await;
                } else {
                    self.print_error().await;
                }
            }
            Command::Archive(target) => {
                let Some(key) = self.resolve_or_current(target.as_ref()).await else {
                    return true;
                };
                if self.controller.archive_session(&key).await {
                    println!("{}", "Chat archived.".bright_green());
                } else {
                    self.print_sessions_error().await;
                }
            }
            Command::Unarchive(target) => {
                let Some(key) = self.resolve(&target) else {
                    return true;
                };
                if self.controller.unarchive_session(&key).await {
                    println!("{}", "Chat restored.".bright_green());
                } else {
                    self.print_sessions_error().await;
                }
            }
            Command::Stats(target) => {
                let Some(key) = self.resolve_or_current(target.as_ref()).await else {
                    return true;
                };
                match self.controller.session_stats(&key).await {
                    Ok(Some(stats)) => println!("{}", render::format_stats(&stats)),
                    Ok(None) => println!("{}", "No statistics for this chat.".bright_black()),
                    Err(_) => println!("{}", "Failed to load chat statistics".red()),
                }
            }
            Command::Message(text) => self.send(&text).await,
            Command::Invalid(line) => {
                println!("{}", format!("Unknown command: {} (try /help)", line).bright_black())
            }
        }
        true
    }

    async fn send(&mut self, text: &str) {
        let before = self.controller.snapshot().await.messages.len();
        match self.controller.send_message(text).await {
            SendOutcome::Skipped => {
                println!("{}", "Request already in progress".yellow());
            }
            outcome => {
                let view = self.controller.snapshot().await;
                for message in view.messages.iter().skip(before).filter(|m| !m.is_user) {
                    println!("{}", render::format_message(message));
                    println!();
                }
                if outcome == SendOutcome::Failed {
                    self.print_error().await;
                }
            }
        }
    }

    fn resolve(&self, target: &Target) -> Option<String> {
        match target {
            Target::Key(key) => Some(key.clone()),
            Target::Index(n) => {
                let key = self.last_listing.get(n - 1).cloned();
                if key.is_none() {
                    println!(
                        "{}",
                        format!("No chat #{} in the last listing (try /sessions)", n).yellow()
                    );
                }
                key
            }
        }
    }

    async fn resolve_or_current(&self, target: Option<&Target>) -> Option<String> {
        match target {
            Some(target) => self.resolve(target),
            None => {
                let key = self.controller.current_session_key().await;
                if key.is_none() {
                    println!("{}", "No chat is open yet.".yellow());
                }
                key
            }
        }
    }

    fn print_listing(
        &mut self,
        title: &str,
        sessions: &[ChatSession],
        view: &ChatViewState,
    ) {
        println!(
            "{}",
            render::format_listing(
                title,
                sessions,
                view.current_session_key.as_deref(),
                Local::now()
            )
        );
        if let Some(error) = &view.sessions_error {
            println!("{}", error.red());
        }
        self.last_listing = sessions.iter().map(|s| s.session_key.clone()).collect();
    }

    async fn print_transcript(&self) {
        let view = self.controller.snapshot().await;
        if view.messages.is_empty() {
            println!("{}", render::welcome());
        }
        for message in &view.messages {
            println!("{}", render::format_message(message));
            println!();
        }
        if let Some(error) = &view.error {
            println!("{}", error.red());
        }
    }

    async fn print_error(&self) {
        if let Some(error) = self.controller.snapshot().await.error {
            println!("{}", error.red());
        }
    }

    async fn print_sessions_error(&self) {
        if let Some(error) = self.controller.snapshot().await.sessions_error {
            println!("{}", error.red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flag_beats_rust_log() {
        assert_eq!(log_directive(Some("debug"), Some("error"), Some("info")), "debug");
        assert_eq!(log_directive(None, Some("error"), Some("info")), "error");
    }

    #[test]
    fn test_quiet_unless_asked() {
        assert_eq!(log_directive(None, None, None), DEFAULT_REPL_LOG_LEVEL);
        assert_eq!(log_directive(None, None, Some("info")), "info");
    }
}
