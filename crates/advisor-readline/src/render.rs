//! Colored text output for the REPL.

use advisor_core::markup::{LineKind, RichLine, RichText};
use advisor_core::session::{ChatMessage, ChatSession, SessionStats};
use chrono::{DateTime, Local};
use colored::{Color, ColoredString, Colorize};

pub const DISCLAIMER: &str = "This is an AI assistant and not a replacement for professional \
therapy. In crisis situations, please contact emergency services or a mental health professional.";

const OPENING_QUESTION: &str = "How are you feeling today, and what's on your mind?";

pub fn banner() -> String {
    [
        "=== AdvisorOP ===".bright_magenta().bold().to_string(),
        "AI Reasoning & Therapy Guide".bright_black().to_string(),
        DISCLAIMER.yellow().to_string(),
        "Type a message to chat, '/help' for commands, or 'quit' to exit."
            .bright_black()
            .to_string(),
    ]
    .join("\n")
}

pub fn welcome() -> String {
    format!(
        "{}\n{}",
        "Welcome to AdvisorOP".bright_green().bold(),
        OPENING_QUESTION.bright_blue()
    )
}

/// Header line plus body of one message.
///
/// Both authors go through [`RichText`], so stored markup never reaches the
/// terminal raw.
pub fn format_message(message: &ChatMessage) -> String {
    let (header, body_color) = if message.is_user {
        (format!("You {}", message.timestamp).green(), Color::White)
    } else {
        (
            format!("Advisor {}", message.timestamp).bright_magenta(),
            Color::BrightBlue,
        )
    };

    let body: Vec<String> = RichText::parse(&message.text)
        .lines
        .iter()
        .map(|line| format_rich_line(line, body_color))
        .collect();

    let mut out = header.bold().to_string();
    for line in body {
        out.push('\n');
        out.push_str(&line);
    }
    out
}

fn format_rich_line(line: &RichLine, color: Color) -> String {
    let mut out = String::new();
    if let LineKind::ListItem { marker, depth } = &line.kind {
        out.push_str(&format!("{}{} ", "  ".repeat(*depth), marker).cyan().to_string());
    }
    for segment in &line.segments {
        let mut piece: ColoredString = segment.text.as_str().color(color);
        if segment.style.code {
            piece = piece.yellow();
        }
        if segment.style.bold || line.kind == LineKind::Heading {
            piece = piece.bold();
        }
        if segment.style.italic {
            piece = piece.italic();
        }
        if line.kind == LineKind::Heading {
            piece = piece.underline();
        }
        out.push_str(&piece.to_string());
    }
    out
}

/// Numbered session listing. Numbers are what `/open <n>` refers to.
pub fn format_listing(
    title: &str,
    sessions: &[ChatSession],
    current: Option<&str>,
    now: DateTime<Local>,
) -> String {
    let mut out = title.bright_yellow().bold().to_string();
    if sessions.is_empty() {
        out.push('\n');
        out.push_str(&"  (none)".bright_black().to_string());
        return out;
    }

    for (i, session) in sessions.iter().enumerate() {
        let marker = if current == Some(session.session_key.as_str()) {
            "*"
        } else {
            " "
        };
        out.push_str(&format!(
            "\n{} {:>2}. {}  {}",
            marker.bright_green(),
            i + 1,
            session.title,
            format!(
                "{} • {} messages",
                session.updated_label(now),
                session.message_count
            )
            .bright_black()
        ));
    }
    out
}

pub fn format_stats(stats: &SessionStats) -> String {
    format!(
        "{}\n  messages:    {} ({} you / {} advisor)\n  characters:  {}\n  duration:    {}\n  last active: {}",
        "Chat statistics".bright_yellow().bold(),
        stats.total_messages,
        stats.user_messages,
        stats.ai_messages,
        stats.total_characters,
        stats.duration_label(),
        stats.last_activity
    )
}
