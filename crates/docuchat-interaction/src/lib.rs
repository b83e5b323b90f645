//! Interaction layer for DocuChat.
//!
//! Provides the HTTP implementation of [`docuchat_core::ChatBackend`].

pub mod http_backend;

pub use http_backend::HttpChatBackend;
