//! Transition inputs and results.

use super::model::SessionTicket;
use crate::conversation::{Conversation, ConversationId, Message, MessageId};
use crate::notification::{Notification, NotificationId};
use crate::upload::PendingFile;

/// Everything that can change [`super::ChatState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The registry was fetched; replaces the conversation list.
    ConversationsLoaded(Vec<Conversation>),
    /// The backend allocated a new conversation.
    SessionStarted(ConversationId),
    /// The history of an existing conversation was fetched.
    SessionLoaded {
        id: ConversationId,
        messages: Vec<Message>,
    },
    /// A file was picked for upload, replacing any previous one. Requires an
    /// active session.
    FileSelected(PendingFile),
    UploadStarted,
    UploadSettled,
    /// The compose buffer changed.
    QuestionEdited(String),
    /// The user asked `text`; on acceptance the compose buffer is cleared.
    QuestionSubmitted { correlation: MessageId, text: String },
    AnswerReceived {
        ticket: QuestionTicket,
        answer: Message,
    },
    AnswerFailed { ticket: QuestionTicket },
    NotificationShown(Notification),
    NotificationExpired(NotificationId),
}

/// Why an action was ignored without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    EmptyQuestion,
    NoActiveSession,
}

/// A question that passed its preconditions and must be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionTicket {
    /// Id of the optimistic user message
    pub correlation: MessageId,
    /// Session the question was asked in
    pub session: SessionTicket,
    pub question: String,
}

impl QuestionTicket {
    pub fn conversation_id(&self) -> ConversationId {
        self.session.conversation_id
    }
}

/// What a transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged,
    Ignored(Ignored),
    /// The session the response belonged to is no longer active.
    Stale,
    QuestionIssued(QuestionTicket),
    NotificationShown(NotificationId),
}
