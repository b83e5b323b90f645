//! Parsing of REPL input lines.

use docuchat_core::conversation::ConversationId;
use std::fmt;
use std::path::PathBuf;

/// Slash commands offered for completion, with their usage hint.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/new", "Start a new conversation"),
    ("/list", "Refresh and list conversations"),
    ("/open", "<id>  Open a conversation"),
    ("/file", "<path>  Choose the document to upload"),
    ("/upload", "Upload the chosen document"),
    ("/sources", "<n>  Show or hide the sources of message n"),
    ("/show", "Print the current conversation"),
    ("/help", "Show this help"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Open(ConversationId),
    File(PathBuf),
    Upload,
    /// 1-based transcript position
    Sources(usize),
    Show,
    Help,
    Quit,
    /// Plain text is a question for the active conversation.
    Ask(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidArgument { command: &'static str, value: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Nothing to do"),
            ParseError::Unknown(name) => write!(f, "Unknown command: {name} (try /help)"),
            ParseError::MissingArgument(usage) => write!(f, "Usage: {usage}"),
            ParseError::InvalidArgument { command, value } => {
                write!(f, "Invalid argument for {command}: {value}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Ok(Command::Quit);
    }
    if !trimmed.starts_with('/') {
        return Ok(Command::Ask(trimmed.to_string()));
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    match name {
        "/new" => Ok(Command::New),
        "/list" => Ok(Command::List),
        "/upload" => Ok(Command::Upload),
        "/show" => Ok(Command::Show),
        "/help" => Ok(Command::Help),
        "/open" => {
            let raw = required(rest, "/open <id>")?;
            raw.parse::<i64>()
                .map(|id| Command::Open(ConversationId(id)))
                .map_err(|_| ParseError::InvalidArgument {
                    command: "/open",
                    value: raw.to_string(),
                })
        }
        "/file" => {
            let raw = required(rest, "/file <path>")?;
            Ok(Command::File(expand_home(raw)))
        }
        "/sources" => {
            let raw = required(rest, "/sources <n>")?;
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Command::Sources(n)),
                _ => Err(ParseError::InvalidArgument {
                    command: "/sources",
                    value: raw.to_string(),
                }),
            }
        }
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(usage))
    } else {
        Ok(rest)
    }
}

/// Expands a leading `~/` to the home directory.
fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}
