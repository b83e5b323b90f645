//! Shared state container.
//!
//! `StateStore` owns the single [`ChatState`] value and is the only place
//! where [`reduce`] is called. Every dispatch that changes the state bumps a
//! version published on a `watch` channel so views know when to re-render.

use docuchat_core::state::{Action, ChatState, Outcome, reduce};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

#[derive(Clone)]
pub struct StateStore {
    state: Arc<RwLock<ChatState>>,
    version: Arc<watch::Sender<u64>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::with_state(ChatState::new())
    }

    pub fn with_state(state: ChatState) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(state)),
            version: Arc::new(version),
        }
    }

    /// Applies an action and returns what it did.
    pub async fn dispatch(&self, action: Action) -> Outcome {
        let outcome = {
            let mut state = self.state.write().await;
            reduce(&mut state, action)
        };

        if !matches!(outcome, Outcome::Unchanged | Outcome::Ignored(_)) {
            self.version.send_modify(|version| *version += 1);
        }
        outcome
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> ChatState {
        self.state.read().await.clone()
    }

    /// Reads a single value out of the state without cloning all of it.
    pub async fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ChatState) -> R,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Subscribes to state changes. The value is a change counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
