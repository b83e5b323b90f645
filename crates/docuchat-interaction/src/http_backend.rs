//! HttpChatBackend - REST implementation of the DocuChat backend contract.
//!
//! Talks to the retrieval backend's JSON API. Every endpoint is joined onto a
//! configurable base URL (default `http://localhost:5000/api`).

use async_trait::async_trait;
use docuchat_core::backend::{Answer, ChatBackend};
use docuchat_core::config::ClientConfig;
use docuchat_core::conversation::{Conversation, ConversationId, Message};
use docuchat_core::error::{DocuChatError, Result};
use docuchat_core::upload::{PendingFile, UploadReceipt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend implementation that talks to the DocuChat HTTP API.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a backend for `base_url` with the given per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DocuChatError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("[HttpChatBackend] GET {}", url);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.get_json("conversations").await
    }

    async fn new_chat(&self) -> Result<ConversationId> {
        let url = self.endpoint("new_chat");
        tracing::debug!("[HttpChatBackend] POST {}", url);
        let response = self.client.post(&url).send().await.map_err(map_send_error)?;
        let body: NewChatResponse = read_json(response).await?;
        Ok(body.conversation_id)
    }

    async fn history(&self, id: ConversationId) -> Result<Vec<Message>> {
        self.get_json(&format!("history/{id}")).await
    }

    async fn upload(&self, file: &PendingFile) -> Result<UploadReceipt> {
        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            DocuChatError::io(format!("Failed to read {}: {err}", file.path.display()))
        })?;
        let mime = mime_guess::from_path(&file.path).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(mime.essence_str())
            .map_err(|err| DocuChatError::io(format!("Invalid MIME type for upload: {err}")))?;
        let form = Form::new().part("file", part);

        let url = self.endpoint("upload");
        tracing::debug!("[HttpChatBackend] POST {} (file={}, mime={})", url, file.name, mime);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response).await
    }

    async fn query(&self, question: &str, conversation_id: ConversationId) -> Result<Answer> {
        let url = self.endpoint("query");
        tracing::debug!(
            "[HttpChatBackend] POST {} (conversation_id={})",
            url,
            conversation_id
        );
        let request = QueryRequest {
            question,
            conversation_id,
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;
        read_json(response).await
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    conversation_id: ConversationId,
}

#[derive(Deserialize)]
struct NewChatResponse {
    conversation_id: ConversationId,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_send_error)?;

    if !status.is_success() {
        return Err(map_http_error(status, &body));
    }

    serde_json::from_slice(&body)
        .map_err(|err| DocuChatError::decode(format!("Failed to parse backend response: {err}")))
}

fn map_send_error(err: reqwest::Error) -> DocuChatError {
    if err.is_decode() {
        DocuChatError::decode(err.to_string())
    } else {
        DocuChatError::transport(err.to_string())
    }
}

/// Builds the error for a non-2xx response, keeping the `{"error": ...}` text
/// when the body carries one.
pub(crate) fn map_http_error(status: StatusCode, body: &[u8]) -> DocuChatError {
    let message = serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .and_then(|wrapper| wrapper.error);

    tracing::debug!(
        "[HttpChatBackend] HTTP {} (error text present: {})",
        status.as_u16(),
        message.is_some()
    );
    DocuChatError::http(status.as_u16(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend =
            HttpChatBackend::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000/api");
        assert_eq!(backend.endpoint("history/7"), "http://localhost:5000/api/history/7");
        assert_eq!(backend.endpoint("/query"), "http://localhost:5000/api/query");
    }

    #[test]
    fn test_http_error_keeps_server_text() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            br#"{"error": "Document not uploaded or processed yet."}"#,
        );
        assert_eq!(
            err,
            DocuChatError::http(400, Some("Document not uploaded or processed yet.".into()))
        );
    }

    #[test]
    fn test_http_error_without_json_body() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err, DocuChatError::http(502, None));
    }

    #[test]
    fn test_query_request_shape() {
        let body = serde_json::to_value(QueryRequest {
            question: "What is X?",
            conversation_id: ConversationId(7),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"question": "What is X?", "conversation_id": 7})
        );
    }
}
