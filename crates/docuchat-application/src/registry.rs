//! Conversation registry.

use crate::notification::NotificationService;
use crate::store::StateStore;
use docuchat_core::backend::ChatBackend;
use docuchat_core::error::Result;
use docuchat_core::state::Action;
use std::sync::Arc;

pub const FETCH_CONVERSATIONS_ERROR: &str = "Error fetching conversations.";

/// Keeps the local list of conversations in sync with the backend.
#[derive(Clone)]
pub struct ConversationRegistry {
    backend: Arc<dyn ChatBackend>,
    store: StateStore,
    notifier: NotificationService,
}

impl ConversationRegistry {
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

    /// Replaces the local list with the backend's.
    ///
    /// On failure the existing list is kept and an error notification is
    /// shown; the error is also returned to the caller.
    pub async fn refresh(&self) -> Result<usize> {
        match self.backend.list_conversations().await {
            Ok(conversations) => {
                let count = conversations.len();
                tracing::debug!("[ConversationRegistry] Loaded {} conversations", count);
                self.store
                    .dispatch(Action::ConversationsLoaded(conversations))
                    .await;
                Ok(count)
            }
            Err(err) => {
                tracing::warn!("[ConversationRegistry] Refresh failed: {}", err);
                self.notifier.error(FETCH_CONVERSATIONS_ERROR).await;
                Err(err)
            }
        }
    }
}
