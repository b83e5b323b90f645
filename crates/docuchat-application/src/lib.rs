//! Application layer for DocuChat.
//!
//! This crate provides the controllers that turn user actions into backend
//! requests and state transitions. All of them share one [`StateStore`] and
//! report outcomes through the [`NotificationService`].

pub mod app;
pub mod chat;
pub mod notification;
pub mod registry;
pub mod session;
pub mod store;
pub mod upload;

pub use app::DocuChatApp;
pub use chat::ChatController;
pub use notification::NotificationService;
pub use registry::ConversationRegistry;
pub use session::SessionController;
pub use store::StateStore;
pub use upload::UploadController;
