//! Application facade.
//!
//! Wires the controllers around one shared store and notification service.

use crate::chat::ChatController;
use crate::notification::NotificationService;
use crate::registry::ConversationRegistry;
use crate::session::SessionController;
use crate::store::StateStore;
use crate::upload::UploadController;
use docuchat_core::backend::ChatBackend;
use docuchat_core::config::ClientConfig;
use docuchat_core::error::Result;
use docuchat_core::state::ChatState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Clone)]
pub struct DocuChatApp {
    store: StateStore,
    notifications: NotificationService,
    registry: ConversationRegistry,
    sessions: SessionController,
    uploads: UploadController,
    chat: ChatController,
}

impl DocuChatApp {
    pub fn new(backend: Arc<dyn ChatBackend>, config: &ClientConfig) -> Self {
        Self::with_notification_ttl(backend, config.notification_ttl())
    }

    pub fn with_notification_ttl(backend: Arc<dyn ChatBackend>, ttl: Duration) -> Self {
        let store = StateStore::new();
        let notifications = NotificationService::new(store.clone(), ttl);
        let registry =
            ConversationRegistry::new(backend.clone(), store.clone(), notifications.clone());
        let sessions = SessionController::new(
            backend.clone(),
            store.clone(),
            notifications.clone(),
            registry.clone(),
        );
        let uploads = UploadController::new(backend.clone(), store.clone(), notifications.clone());
        let chat = ChatController::new(backend, store.clone(), notifications.clone());

        Self {
            store,
            notifications,
            registry,
            sessions,
            uploads,
            chat,
        }
    }

    /// Initial load: fetches the conversation list.
    pub async fn mount(&self) -> Result<usize> {
        self.registry.refresh().await
    }

    pub async fn snapshot(&self) -> ChatState {
        self.store.snapshot().await
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionController {
        &self.sessions
    }

    pub fn uploads(&self) -> &UploadController {
        &self.uploads
    }

    pub fn chat(&self) -> &ChatController {
        &self.chat
    }
}
