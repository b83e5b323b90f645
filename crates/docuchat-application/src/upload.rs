//! Upload controller.

use crate::notification::NotificationService;
use crate::store::StateStore;
use docuchat_core::backend::ChatBackend;
use docuchat_core::error::{DocuChatError, Result};
use docuchat_core::state::{Action, Outcome};
use docuchat_core::upload::{PendingFile, UploadReceipt};
use std::path::PathBuf;
use std::sync::Arc;

pub const MISSING_FILE_OR_SESSION: &str = "Please select a file and start a new chat first.";
pub const UPLOAD_SUCCESS_DEFAULT: &str = "File processed successfully!";
pub const UPLOAD_FAILURE_DEFAULT: &str = "Failed to upload file.";

/// Holds the one pending file of the active session and submits it.
///
/// The `is_uploading` flag in the state is advisory: it tells the view to
/// disable the upload control, it does not lock out a second submission.
#[derive(Clone)]
pub struct UploadController {
    backend: Arc<dyn ChatBackend>,
    store: StateStore,
    notifier: NotificationService,
}

impl UploadController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        store: StateStore,
        notifier: NotificationService,
    ) -> Self {
        Self {
            backend,
            store,
            notifier,
        }
    }

    /// Stores `path` as the pending file, replacing any previous one.
    pub async fn select_file(&self, path: impl Into<PathBuf>) -> Result<PendingFile> {
        let file = PendingFile::new(path);
        match self.store.dispatch(Action::FileSelected(file.clone())).await {
            Outcome::Ignored(_) => {
                self.notifier.error(MISSING_FILE_OR_SESSION).await;
                Err(DocuChatError::precondition(MISSING_FILE_OR_SESSION))
            }
            _ => {
                tracing::debug!("[UploadController] Selected {}", file.path.display());
                Ok(file)
            }
        }
    }

    /// Uploads the pending file.
    ///
    /// Requires a pending file and an active session; otherwise nothing is
    /// sent. The pending file is kept whatever the result.
    pub async fn submit(&self) -> Result<UploadReceipt> {
        let (file, session) = self
            .store
            .read(|state| (state.pending_file.clone(), state.active_conversation()))
            .await;
        let (Some(file), Some(session)) = (file, session) else {
            self.notifier.error(MISSING_FILE_OR_SESSION).await;
            return Err(DocuChatError::precondition(MISSING_FILE_OR_SESSION));
        };

        tracing::info!(
            "[UploadController] Uploading {} for conversation {}",
            file.name,
            session
        );
        self.store.dispatch(Action::UploadStarted).await;
        let result = self.backend.upload(&file).await;

        match &result {
            Ok(receipt) => {
                let text = receipt
                    .message
                    .clone()
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| UPLOAD_SUCCESS_DEFAULT.to_string());
                self.notifier.success(text).await;
            }
            Err(err) => {
                tracing::warn!("[UploadController] Upload of {} failed: {}", file.name, err);
                self.notifier
                    .error(err.user_message(UPLOAD_FAILURE_DEFAULT))
                    .await;
            }
        }

        self.store.dispatch(Action::UploadSettled).await;
        result
    }
}
