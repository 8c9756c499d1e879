//! Frame rendering.

use crate::app::{Focus, TuiApp};
use crate::rich::{rich_lines, wrap_lines};
use advisor_core::markup::RichText;
use advisor_core::session::{ChatMessage, ChatSession};
use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub const TITLE: &str = "AdvisorOP";
pub const SUBTITLE: &str = "AI Reasoning & Therapy Guide";
pub const DISCLAIMER: &str = "This is an AI assistant and not a replacement for professional \
therapy. In crisis situations, please contact emergency services or a mental health professional.";

const WELCOME_TITLE: &str = "Welcome to AdvisorOP";
const WELCOME_TEXT: &str = "I'm here to help you explore your thoughts and feelings through \
supportive conversation and gentle reasoning. This is a safe, non-judgmental space where you can \
share what's on your mind.";
const FEATURES: [(&str, &str); 3] = [
    (
        "Empathetic Listening",
        "I validate your emotions and create a supportive environment for open sharing.",
    ),
    (
        "Guided Exploration",
        "Through thoughtful questions, I help you break down complex thoughts and feelings.",
    ),
    (
        "Your Own Insights",
        "I empower you to find your own answers and develop personal coping strategies.",
    ),
];
const OPENING_QUESTION: &str = "How are you feeling today, and what's on your mind?";

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const ACCENT: Color = Color::Blue;

pub fn render(frame: &mut Frame<'_>, app: &mut TuiApp) {
    let area = frame.size();

    let sidebar_width = if app.sidebar_collapsed {
        18
    } else {
        ((area.width as f32 * 0.3) as u16).clamp(24, 40)
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(20)])
        .split(area);

    render_sidebar(frame, app, columns[0]);

    let error_height = if app.view.error.is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(error_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    render_header(frame, app, rows[0]);
    if app.view.messages.is_empty() {
        render_welcome(frame, rows[1]);
    } else {
        render_transcript(frame, app, rows[1]);
    }
    if let Some(error) = &app.view.error {
        render_error(frame, error, rows[2]);
    }
    render_composer(frame, app, rows[3]);
    render_status(frame, app, rows[4]);
}

fn render_header(frame: &mut Frame<'_>, app: &TuiApp, area: Rect) {
    let mut title = vec![Span::styled(
        TITLE,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    if app.view.is_loading || app.view.sessions_loading || app.busy {
        title.push(Span::styled(
            format!(" {}", SPINNER[app.spinner_tick % SPINNER.len()]),
            Style::default().fg(Color::Magenta),
        ));
    }
    let lines = vec![
        Line::from(title),
        Line::styled(SUBTITLE, Style::default().fg(Color::Gray)),
        Line::styled(DISCLAIMER, Style::default().fg(Color::DarkGray)),
    ];
    let header = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn render_welcome(frame: &mut Frame<'_>, area: Rect) {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled(WELCOME_TITLE, heading.fg(ACCENT)),
        Line::from(""),
        Line::from(WELCOME_TEXT),
        Line::from(""),
    ];
    for (name, blurb) in FEATURES {
        lines.push(Line::styled(name, heading));
        lines.push(Line::styled(blurb, Style::default().fg(Color::Gray)));
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(OPENING_QUESTION, heading.fg(Color::Magenta)));

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(welcome, area);
}

/// Transcript as wrapped rows for `width` columns.
pub fn transcript_rows(messages: &[ChatMessage], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in messages {
        let (label, color) = if message.is_user {
            ("You", Color::Green)
        } else {
            ("Advisor", ACCENT)
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", message.timestamp),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.extend(rich_lines(&RichText::parse(&message.text), Style::default()));
        lines.push(Line::from(""));
    }
    wrap_lines(&lines, width)
}

fn render_transcript(frame: &mut Frame<'_>, app: &mut TuiApp, area: Rect) {
    let block = Block::default().borders(Borders::NONE);
    let inner = block.inner(area);
    let rows = transcript_rows(&app.view.messages, inner.width as usize);

    let height = inner.height as usize;
    let max_scroll = rows.len().saturating_sub(height);
    let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
    app.scroll_from_bottom = app.scroll_from_bottom.min(max_scroll);
    let top = max_scroll - app.scroll_from_bottom;

    let visible: Vec<Line<'static>> = rows
        .into_iter()
        .skip(top as usize)
        .take(height)
        .collect();
    frame.render_widget(Paragraph::new(Text::from(visible)).block(block), area);
}

fn render_error(frame: &mut Frame<'_>, error: &str, area: Rect) {
    let banner = Paragraph::new(error.to_string())
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(banner, area);
}

fn render_composer(frame: &mut Frame<'_>, app: &TuiApp, area: Rect) {
    let focused = app.focus == Focus::Composer;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Message")
        .border_style(if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        });
    let inner = block.inner(area);

    if app.is_thinking() {
        let thinking = Paragraph::new(Span::styled(
            "Thinking…",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        frame.render_widget(thinking, area);
        return;
    }

    let (text, cursor) = app.composer.visible(inner.width as usize);
    let content = if text.is_empty() && !focused {
        Span::styled("Share what's on your mind...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(text)
    };
    frame.render_widget(Paragraph::new(content).block(block), area);
    if focused && inner.width > 0 {
        frame.set_cursor(inner.x + cursor as u16, inner.y);
    }
}

fn render_status(frame: &mut Frame<'_>, app: &TuiApp, area: Rect) {
    let text = match &app.status {
        Some(status) => Span::styled(status.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            "Tab focus · Ctrl-N new chat · Ctrl-B sidebar · Ctrl-R refresh · PgUp/PgDn scroll · Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn render_sidebar(frame: &mut Frame<'_>, app: &mut TuiApp, area: Rect) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if app.sidebar_collapsed { "Chats" } else { "Chats (Ctrl-N: New Chat)" })
        .border_style(if focused {
            Style::default().fg(ACCENT)
        } else {
            Style::default()
        });

    let now = Local::now();
    let mut lines: Vec<Line<'static>> = Vec::new();
    let muted = Style::default().fg(Color::DarkGray);
    let section = muted.add_modifier(Modifier::BOLD);

    if app.view.sessions_loading && app.view.active_sessions.is_empty() {
        lines.push(Line::styled("Loading chats...", muted));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let entries = app.sidebar_entries();
    let selected_key = entries.get(app.selected).map(|e| e.session_key.as_str());
    let mut selected_rows = None;
    let item = |session: &ChatSession, lines: &mut Vec<Line<'static>>| -> bool {
        let is_entry = selected_key == Some(session.session_key.as_str());
        let is_selected = focused && is_entry;
        let is_current = app.view.is_current(&session.session_key);
        let marker = if is_current { "▌" } else { " " };
        let mut title_style = Style::default();
        if is_current {
            title_style = title_style.fg(ACCENT).add_modifier(Modifier::BOLD);
        }
        if is_selected {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACCENT)),
            Span::styled(session.title.clone(), title_style),
        ]));
        if !app.sidebar_collapsed {
            lines.push(Line::styled(
                format!(
                    "  {} • {} messages",
                    session.updated_label(now),
                    session.message_count
                ),
                muted,
            ));
        }
        is_entry
    };

    if !app.sidebar_collapsed {
        lines.push(Line::styled("Recent Chats", section));
    }
    let active = app.visible_active_sessions();
    if app.view.active_sessions.is_empty() {
        if !app.sidebar_collapsed {
            lines.push(Line::styled("No chats yet", muted));
            lines.push(Line::styled("Start a new conversation!", muted));
        }
    } else {
        // The first entry of a section scrolls its heading into view too.
        let mut first = 0;
        for session in active {
            if item(session, &mut lines) {
                selected_rows = Some((first, lines.len()));
            }
            first = lines.len();
        }
        if app.sidebar_collapsed && app.view.active_sessions.len() > active.len() {
            lines.push(Line::styled(" …", muted));
        }
    }

    if !app.sidebar_collapsed && !app.view.archived_sessions.is_empty() {
        let mut first = lines.len();
        lines.push(Line::from(""));
        let arrow = if app.show_archived { "▾" } else { "▸" };
        lines.push(Line::styled(
            format!("{} Archived ({})", arrow, app.view.archived_sessions.len()),
            section,
        ));
        if app.show_archived {
            for session in &app.view.archived_sessions {
                if item(session, &mut lines) {
                    selected_rows = Some((first, lines.len()));
                }
                first = lines.len();
            }
        }
    }

    if let Some(error) = &app.view.sessions_error {
        lines.push(Line::from(""));
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    }

    let height = block.inner(area).height as usize;
    let offset = sidebar_offset(app.sidebar_scroll as usize, selected_rows, lines.len(), height);
    app.sidebar_scroll = u16::try_from(offset).unwrap_or(u16::MAX);

    let sidebar = Paragraph::new(lines)
        .block(block)
        .scroll((app.sidebar_scroll, 0));
    frame.render_widget(sidebar, area);
}

/// First sidebar row to draw: moves the previous offset just enough to keep
/// the selected entry's rows (`[start, end)`) on screen.
fn sidebar_offset(
    previous: usize,
    selected: Option<(usize, usize)>,
    total: usize,
    height: usize,
) -> usize {
    let mut offset = previous;
    if let Some((start, end)) = selected {
        if start < offset {
            offset = start;
        } else if end > offset + height {
            offset = end.saturating_sub(height);
        }
    }
    offset.min(total.saturating_sub(height))
}
