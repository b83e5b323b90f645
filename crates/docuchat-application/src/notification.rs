//! Notification service.
//!
//! Shows one notification at a time and clears it after a fixed delay. A new
//! notification cancels the pending expiry of the previous one before
//! scheduling its own.

use crate::store::StateStore;
use docuchat_core::notification::{Notification, NotificationId};
use docuchat_core::state::{Action, Outcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct NotificationService {
    store: StateStore,
    ttl: Duration,
    /// Expiry task of the notification currently on screen
    expiry: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NotificationService {
    pub fn new(store: StateStore, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            expiry: Arc::new(Mutex::new(None)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces the visible notification and schedules its removal.
    pub async fn notify(&self, notification: Notification) -> Option<NotificationId> {
        let mut expiry = self.expiry.lock().await;
        if let Some(previous) = expiry.take() {
            previous.abort();
        }

        tracing::debug!(
            "[NotificationService] {:?}: {}",
            notification.kind,
            notification.text
        );
        let Outcome::NotificationShown(id) = self
            .store
            .dispatch(Action::NotificationShown(notification))
            .await
        else {
            return None;
        };

        let store = self.store.clone();
        let ttl = self.ttl;
        *expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            store.dispatch(Action::NotificationExpired(id)).await;
        }));

        Some(id)
    }

    pub async fn success(&self, text: impl Into<String>) -> Option<NotificationId> {
        self.notify(Notification::success(text)).await
    }

    pub async fn error(&self, text: impl Into<String>) -> Option<NotificationId> {
        self.notify(Notification::error(text)).await
    }
}
