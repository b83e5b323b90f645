//! Error types for the DocuChat client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every DocuChat crate.
///
/// The variants follow the failure taxonomy the client surfaces to the user:
/// transport, HTTP status, precondition and decode failures, plus local I/O
/// and configuration problems.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocuChatError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no error text"))]
    Http {
        status: u16,
        /// Error text from the `{"error": ...}` body, when the body carried one
        message: Option<String>,
    },

    /// A required piece of state was missing before the action ran
    #[error("{0}")]
    Precondition(String),

    /// The response body was not the JSON we expected
    #[error("Decode error: {0}")]
    Decode(String),

    /// IO error (reading the file to upload, config file, ...)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DocuChatError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: Option<String>) -> Self {
        Self::Http { status, message }
    }

    /// Creates a Precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if this is an HTTP status error
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Check if this is a precondition error
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the text shown to the user for this error.
    ///
    /// HTTP failures show the backend's error text, falling back to `default`
    /// when the body carried none. Every other kind shows its own description.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::Http {
                message: Some(text),
                ..
            } if !text.is_empty() => text.clone(),
            Self::Http { .. } => default.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DocuChatError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DocuChatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<toml::de::Error> for DocuChatError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// A type alias for `Result<T, DocuChatError>`.
pub type Result<T> = std::result::Result<T, DocuChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = DocuChatError::http(400, Some("Document not uploaded or processed yet.".into()));
        assert_eq!(
            err.user_message("Failed to get answer"),
            "Document not uploaded or processed yet."
        );
    }

    #[test]
    fn test_user_message_falls_back_to_default() {
        let err = DocuChatError::http(500, None);
        assert_eq!(err.user_message("Failed to upload file."), "Failed to upload file.");

        let err = DocuChatError::http(500, Some(String::new()));
        assert_eq!(err.user_message("Failed to upload file."), "Failed to upload file.");
    }

    #[test]
    fn test_user_message_for_transport_uses_description() {
        let err = DocuChatError::transport("connection refused");
        assert_eq!(
            err.user_message("Failed to get answer"),
            "Transport error: connection refused"
        );
        assert!(err.is_transport());
        assert!(!err.is_http());
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: DocuChatError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_decode());
    }
}
