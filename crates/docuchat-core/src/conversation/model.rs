//! Conversation records as listed by the backend.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-issued conversation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub i64);

impl ConversationId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ConversationId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A conversation known to the backend.
///
/// Created by the backend on a "new chat" request and never modified
/// afterwards. The client only ever references it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    /// Creation timestamp exactly as the backend reported it
    pub created_at: String,
}

impl Conversation {
    /// Sidebar label, e.g. `Chat #7`.
    pub fn label(&self) -> String {
        format!("Chat #{}", self.id)
    }

    /// Parses `created_at`.
    ///
    /// Accepts the SQLite `CURRENT_TIMESTAMP` layout (`YYYY-MM-DD HH:MM:SS`)
    /// as well as RFC 3339.
    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.naive_utc())
            })
    }
}
