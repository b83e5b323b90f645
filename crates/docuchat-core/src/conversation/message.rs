//! Transcript message types.
//!
//! The wire layout matches the backend's history and answer payloads, where
//! the text field is named `message` and `sources` may be absent.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Answer produced by the backend.
    Ai,
}

/// Page reference of a citation.
///
/// Most loaders report a page number; some report a label instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourcePage {
    Number(i64),
    Label(String),
}

impl fmt::Display for SourcePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePage::Number(n) => write!(f, "{n}"),
            SourcePage::Label(label) => f.write_str(label),
        }
    }
}

impl From<i64> for SourcePage {
    fn from(value: i64) -> Self {
        SourcePage::Number(value)
    }
}

impl From<&str> for SourcePage {
    fn from(value: &str) -> Self {
        SourcePage::Label(value.to_string())
    }
}

/// A snippet of the uploaded document cited by an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub content: String,
    pub page: SourcePage,
}

impl Source {
    pub fn new(content: impl Into<String>, page: impl Into<SourcePage>) -> Self {
        Self {
            content: content.into(),
            page: page.into(),
        }
    }
}

/// A single turn in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    #[serde(rename = "message")]
    pub text: String,
    /// Citations in backend order; only AI messages carry any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Message {
    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    /// Creates an AI message with its citations.
    pub fn ai(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            sources,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// True when the message should offer a citation disclosure.
    pub fn has_sources(&self) -> bool {
        self.sender == Sender::Ai && !self.sources.is_empty()
    }
}

/// Client-side correlation id for a transcript entry.
///
/// Never sent to the backend; used to remove an optimistic entry by identity
/// rather than by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
