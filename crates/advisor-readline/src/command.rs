//! REPL input parsing.

/// Session reference typed after a command: a 1-based index into the last
/// printed listing, or a session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(usize),
    Key(String),
}

impl Target {
    fn parse(arg: &str) -> Self {
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Self::Index(n),
            _ => Self::Key(arg.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Quit,
    Help,
    New,
    Sessions,
    Archived,
    Open(Target),
    /// Archives the target, or the open session when none is given.
    Archive(Option<Target>),
    Unarchive(Target),
    Stats(Option<Target>),
    Message(String),
    /// A slash command that is unknown or lacks its argument.
    Invalid(String),
}

/// Commands offered for completion and hints.
pub const COMMANDS: [&str; 9] = [
    "/new",
    "/sessions",
    "/archived",
    "/open",
    "/archive",
    "/unarchive",
    "/stats",
    "/help",
    "quit",
];

pub const HELP: &str = "\
/new                 start a new chat
/sessions            list recent chats
/archived            list archived chats
/open <n|key>        open a chat from the last listing or by key
/archive [n|key]     archive a chat (default: the open one)
/unarchive <n|key>   restore an archived chat
/stats [n|key]       show statistics (default: the open chat)
/help                show this help
quit                 leave";

pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Command::Quit;
    }
    if !trimmed.starts_with('/') {
        return Command::Message(trimmed.to_string());
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match (name, arg) {
        ("/new", None) => Command::New,
        ("/sessions", None) => Command::Sessions,
        ("/archived", None) => Command::Archived,
        ("/help", None) => Command::Help,
        ("/open", Some(arg)) => Command::Open(Target::parse(arg)),
        ("/archive", arg) => Command::Archive(arg.map(Target::parse)),
        ("/unarchive", Some(arg)) => Command::Unarchive(Target::parse(arg)),
        ("/stats", arg) => Command::Stats(arg.map(Target::parse)),
        _ => Command::Invalid(trimmed.to_string()),
    }
}
