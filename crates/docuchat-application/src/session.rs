//! Session controller.
//!
//! Owns the transitions between "no session", a freshly allocated session and
//! a session loaded from history. Each transition resets the transcript and
//! the pending file together.
//!
//! Concurrent switches are not coordinated: when two switches overlap, the
//! one whose response resolves last wins.

use crate::notification::NotificationService;
use crate::registry::ConversationRegistry;
use crate::store::StateStore;
use docuchat_core::backend::ChatBackend;
use docuchat_core::conversation::ConversationId;
use docuchat_core::error::Result;
use docuchat_core::state::Action;
use std::sync::Arc;

pub const START_NEW_ERROR: &str = "Error starting new chat.";
pub const LOAD_CONVERSATION_ERROR: &str = "Error loading conversation.";

#[derive(Clone)]
pub struct SessionController {
    backend: Arc<dyn ChatBackend>,
    store: StateStore,
    notifier: NotificationService,
    registry: ConversationRegistry,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        store: StateStore,
        notifier: NotificationService,
        registry: ConversationRegistry,
    ) -> Self {
        Self {
            backend,
            store,
            notifier,
            registry,
        }
    }

    /// Allocates a new conversation and makes it active.
    ///
    /// The registry is refreshed afterwards; a failed refresh is reported by
    /// the registry itself and does not fail this call.
    pub async fn start_new(&self) -> Result<ConversationId> {
        let id = match self.backend.new_chat().await {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!("[SessionController] new_chat failed: {}", err);
                self.notifier.error(START_NEW_ERROR).await;
                return Err(err);
            }
        };

        self.store.dispatch(Action::SessionStarted(id)).await;
        tracing::info!("[SessionController] Started conversation {}", id);

        let _ = self.registry.refresh().await;
        Ok(id)
    }

    /// Loads the history of `id` and makes it active.
    ///
    /// Nothing changes unless the history arrives; there is no partial switch.
    pub async fn select(&self, id: ConversationId) -> Result<()> {
        let messages = match self.backend.history(id).await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!("[SessionController] history({}) failed: {}", id, err);
                self.notifier.error(LOAD_CONVERSATION_ERROR).await;
                return Err(err);
            }
        };

        tracing::info!(
            "[SessionController] Loaded conversation {} ({} messages)",
            id,
            messages.len()
        );
        self.store
            .dispatch(Action::SessionLoaded { id, messages })
            .await;
        Ok(())
    }
}
