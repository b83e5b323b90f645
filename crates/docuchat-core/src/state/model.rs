//! The state value rendered by the views.

use crate::conversation::{Conversation, ConversationId, Message, MessageId};
use crate::notification::{LiveNotification, Notification};
use crate::upload::PendingFile;

/// Identifies one activation of a conversation.
///
/// The epoch increases on every session transition, so selecting the same
/// conversation twice yields two distinct tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTicket {
    pub conversation_id: ConversationId,
    pub epoch: u64,
}

/// Which conversation, if any, the transcript belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    NoSession,
    Active(SessionTicket),
}

impl SessionState {
    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            SessionState::NoSession => None,
            SessionState::Active(ticket) => Some(ticket.conversation_id),
        }
    }

    pub fn ticket(&self) -> Option<SessionTicket> {
        match self {
            SessionState::NoSession => None,
            SessionState::Active(ticket) => Some(*ticket),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active(_))
    }
}

/// A transcript message together with its correlation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: MessageId,
    pub message: Message,
}

/// Ordered messages of the active session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a transcript from backend history, assigning fresh ids.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            entries: messages
                .into_iter()
                .map(|message| TranscriptEntry {
                    id: MessageId::new(),
                    message,
                })
                .collect(),
        }
    }

    pub fn push(&mut self, id: MessageId, message: Message) {
        self.entries.push(TranscriptEntry { id, message });
    }

    /// Removes the entry with the given id, wherever it sits.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).message)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TranscriptEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.entries.iter().map(|entry| entry.message.clone()).collect()
    }
}

/// Everything the view renders.
///
/// Invariant: `transcript` and `pending_file` always belong to the conversation
/// in `session`; with no session both are empty.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Conversations as last listed by the backend
    pub conversations: Vec<Conversation>,
    pub session: SessionState,
    pub transcript: Transcript,
    pub pending_file: Option<PendingFile>,
    /// Compose input buffer
    pub question: String,
    pub is_uploading: bool,
    pub notification: Option<LiveNotification>,
    /// Correlation id of the question awaiting an answer
    pub(crate) pending_question: Option<MessageId>,
    pub(crate) epoch: u64,
    pub(crate) notification_seq: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_conversation(&self) -> Option<ConversationId> {
        self.session.conversation_id()
    }

    /// True while a question is awaiting its answer.
    pub fn is_loading(&self) -> bool {
        self.pending_question.is_some()
    }

    /// Whether the upload control should be enabled.
    pub fn can_upload(&self) -> bool {
        self.pending_file.is_some() && !self.is_uploading
    }

    /// Whether the compose control should accept a submission.
    pub fn can_ask(&self) -> bool {
        !self.is_loading() && !self.question.trim().is_empty()
    }

    pub fn current_notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|live| &live.notification)
    }
}
