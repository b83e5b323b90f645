//! Backend trait.
//!
//! Defines the request/response contract the client controllers use to talk
//! to the retrieval backend.

use crate::conversation::{Conversation, ConversationId, Message, Source};
use crate::error::Result;
use crate::upload::{PendingFile, UploadReceipt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An answer to a question, with its citations in backend order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl Answer {
    /// Converts the answer into the AI transcript message.
    pub fn into_message(self) -> Message {
        Message::ai(self.answer, self.sources)
    }
}

/// An abstract backend for document question answering.
///
/// This trait decouples the controllers from the transport, so the
/// application layer can be exercised against in-memory implementations.
///
/// Every failure mode (transport, non-2xx, decode) is reported through
/// [`crate::error::DocuChatError`].
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Lists known conversations, in the order the backend returns them.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Asks the backend to allocate a new conversation.
    async fn new_chat(&self) -> Result<ConversationId>;

    /// Fetches the stored transcript for a conversation.
    async fn history(&self, id: ConversationId) -> Result<Vec<Message>>;

    /// Uploads a document for the backend to index.
    async fn upload(&self, file: &PendingFile) -> Result<UploadReceipt>;

    /// Asks a question within a conversation.
    async fn query(&self, question: &str, conversation_id: ConversationId) -> Result<Answer>;
}
