//! Domain layer for the DocuChat client.
//!
//! Holds the conversation model, the client state container and its reducer,
//! the backend contract, the error type, and configuration. Nothing in this
//! crate performs network I/O.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod display;
pub mod error;
pub mod notification;
pub mod state;
pub mod upload;

// Re-export common types
pub use backend::{Answer, ChatBackend};
pub use config::ClientConfig;
pub use conversation::{Conversation, ConversationId, Message, MessageId, Sender, Source, SourcePage};
pub use error::{DocuChatError, Result};
pub use notification::{Notification, NotificationId, NotificationKind};
pub use state::{Action, ChatState, Outcome, SessionState};
pub use upload::{PendingFile, UploadReceipt};
