//! UI state of the terminal client and its key bindings.

use crate::composer::Composer;
use advisor_application::ChatViewState;
use advisor_core::config::UiConfig;
use advisor_core::session::ChatSession;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Sessions shown while the sidebar is collapsed.
pub const COLLAPSED_SESSION_LIMIT: usize = 5;
pub const BUSY_STATUS: &str = "Request already in progress";
const SCROLL_STEP: u16 = 5;

/// Pane receiving key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Sidebar,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    None,
    Quit,
    Send(String),
    NewChat,
    SelectSession(String),
    Archive(String),
    Unarchive(String),
    RefreshSessions,
    ShowStats(String),
}

/// A selectable sidebar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub session_key: String,
    pub archived: bool,
}

pub struct TuiApp {
    pub view: ChatViewState,
    pub composer: Composer,
    pub focus: Focus,
    pub sidebar_collapsed: bool,
    pub show_archived: bool,
    /// Index into [`TuiApp::sidebar_entries`].
    pub selected: usize,
    /// Rows scrolled up from the latest message; 0 follows the transcript.
    pub scroll_from_bottom: u16,
    /// First sidebar row drawn; kept by the renderer so the selection is visible.
    pub sidebar_scroll: u16,
    pub status: Option<String>,
    /// A controller action is in flight.
    pub busy: bool,
    pub spinner_tick: usize,
}

impl TuiApp {
    pub fn new(ui: &UiConfig) -> Self {
        Self {
            view: ChatViewState::default(),
            composer: Composer::new(),
            focus: Focus::Composer,
            sidebar_collapsed: ui.sidebar_collapsed,
            show_archived: ui.show_archived,
            selected: 0,
            scroll_from_bottom: 0,
            sidebar_scroll: 0,
            status: None,
            busy: false,
            spinner_tick: 0,
        }
    }

    /// Adopts a fresh controller snapshot.
    pub fn sync(&mut self, view: ChatViewState) {
        if view.current_session_key != self.view.current_session_key {
            self.scroll_from_bottom = 0;
        }
        self.view = view;
        let entries = self.sidebar_entries().len();
        if self.selected >= entries {
            self.selected = entries.saturating_sub(1);
        }
    }

    pub fn tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
    }

    /// A send is in flight: the composer shows "Thinking…".
    pub fn is_thinking(&self) -> bool {
        self.view.is_loading
    }

    /// Active sessions as listed in the sidebar; at most five when collapsed.
    pub fn visible_active_sessions(&self) -> &[ChatSession] {
        let sessions = &self.view.active_sessions;
        if self.sidebar_collapsed {
            &sessions[..sessions.len().min(COLLAPSED_SESSION_LIMIT)]
        } else {
            sessions
        }
    }

    pub fn archived_visible(&self) -> bool {
        !self.sidebar_collapsed && self.show_archived
    }

    /// Selectable rows in display order.
    pub fn sidebar_entries(&self) -> Vec<SidebarEntry> {
        let active = self.visible_active_sessions().iter().map(|s| SidebarEntry {
            session_key: s.session_key.clone(),
            archived: false,
        });
        let archived = self
            .view
            .archived_sessions
            .iter()
            .filter(|_| self.archived_visible())
            .map(|s| SidebarEntry {
                session_key: s.session_key.clone(),
                archived: true,
            });
        active.chain(archived).collect()
    }

    pub fn selected_entry(&self) -> Option<SidebarEntry> {
        self.sidebar_entries().into_iter().nth(self.selected)
    }

    pub fn handle_event(&mut self, event: Event) -> AppAction {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) if self.focus == Focus::Composer => {
                self.composer.insert_str(&text);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => return AppAction::Quit,
            KeyCode::Char('c') if ctrl => return AppAction::Quit,
            KeyCode::Char('n') if ctrl => return self.request(AppAction::NewChat),
            KeyCode::Char('r') if ctrl => return self.request(AppAction::RefreshSessions),
            KeyCode::Char('b') if ctrl => {
                self.sidebar_collapsed = !self.sidebar_collapsed;
                self.sync(self.view.clone());
                return AppAction::None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Composer => Focus::Sidebar,
                    Focus::Sidebar => Focus::Composer,
                };
                return AppAction::None;
            }
            KeyCode::PageUp => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(SCROLL_STEP);
                return AppAction::None;
            }
            KeyCode::PageDown => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(SCROLL_STEP);
                return AppAction::None;
            }
            _ => {}
        }

        match self.focus {
            Focus::Composer => self.handle_composer_key(key, ctrl),
            Focus::Sidebar => self.handle_sidebar_key(key),
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent, ctrl: bool) -> AppAction {
        match key.code {
            KeyCode::Enter => {
                if self.composer.is_blank() {
                    return AppAction::None;
                }
                if self.busy || self.is_thinking() {
                    self.status = Some(BUSY_STATUS.to_string());
                    return AppAction::None;
                }
                self.scroll_from_bottom = 0;
                self.status = None;
                AppAction::Send(self.composer.take())
            }
            KeyCode::Backspace => {
                self.composer.backspace();
                AppAction::None
            }
            KeyCode::Delete => {
                self.composer.delete();
                AppAction::None
            }
            KeyCode::Left => {
                self.composer.move_left();
                AppAction::None
            }
            KeyCode::Right => {
                self.composer.move_right();
                AppAction::None
            }
            KeyCode::Home => {
                self.composer.home();
                AppAction::None
            }
            KeyCode::End => {
                self.composer.end();
                AppAction::None
            }
            KeyCode::Char(ch) if !ctrl => {
                self.composer.insert(ch);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.sidebar_entries().len() {
                    self.selected += 1;
                }
                AppAction::None
            }
            KeyCode::Char('v') => {
                self.show_archived = !self.show_archived;
                self.sync(self.view.clone());
                AppAction::None
            }
            KeyCode::Enter => match self.selected_entry() {
                Some(entry) => self.request(AppAction::SelectSession(entry.session_key)),
                None => AppAction::None,
            },
            KeyCode::Char('a') => match self.selected_entry() {
                Some(entry) if entry.archived => {
                    self.request(AppAction::Unarchive(entry.session_key))
                }
                Some(entry) => self.request(AppAction::Archive(entry.session_key)),
                None => AppAction::None,
            },
            KeyCode::Char('i') => match self.selected_entry() {
                Some(entry) => self.request(AppAction::ShowStats(entry.session_key)),
                None => AppAction::None,
            },
            _ => AppAction::None,
        }
    }

    /// Passes `action` through unless another one is still running.
    fn request(&mut self, action: AppAction) -> AppAction {
        if self.busy {
            self.status = Some(BUSY_STATUS.to_string());
            return AppAction::None;
        }
        self.status = None;
        action
    }
}
