//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: Backend-issued conversation records (`Conversation`, `ConversationId`)
//! - `message`: Transcript message types (`Sender`, `Message`, `Source`, `SourcePage`)

mod message;
mod model;

// Re-export public API
pub use message::{Message, MessageId, Sender, Source, SourcePage};
pub use model::{Conversation, ConversationId};
