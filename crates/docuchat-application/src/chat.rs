//! Chat transcript controller.
//!
//! Questions are appended to the transcript before the backend answers. The
//! optimistic entry carries a correlation id so a failure removes exactly that
//! entry, and the question carries the session ticket it was asked in so an
//! answer arriving after a session switch is dropped.

use crate::notification::NotificationService;
use crate::store::StateStore;
use docuchat_core::backend::ChatBackend;
use docuchat_core::conversation::MessageId;
use docuchat_core::error::Result;
use docuchat_core::state::{Action, Ignored, Outcome};
use std::sync::Arc;

pub const QUERY_FAILURE_DEFAULT: &str = "Failed to get answer";

/// How an `ask` ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    /// Nothing was sent (empty question or no active session).
    Ignored(Ignored),
    /// The answer was appended to the transcript.
    Answered,
    /// The answer arrived for a session that is no longer active.
    Discarded,
}

#[derive(Clone)]
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    store: StateStore,
    notifier: NotificationService,
}

impl ChatController {
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

    /// Updates the compose buffer.
    pub async fn edit(&self, text: impl Into<String>) {
        self.store.dispatch(Action::QuestionEdited(text.into())).await;
    }

    /// Asks whatever is in the compose buffer.
    pub async fn submit_draft(&self) -> Result<AskOutcome> {
        let draft = self.store.read(|state| state.question.clone()).await;
        self.ask(draft).await
    }

    /// Asks `text` in the active session.
    ///
    /// Does nothing for an empty question or without an active session.
    /// On failure the optimistic question is rolled back, an error
    /// notification is shown and the error is returned.
    pub async fn ask(&self, text: impl Into<String>) -> Result<AskOutcome> {
        let correlation = MessageId::new();
        let outcome = self
            .store
            .dispatch(Action::QuestionSubmitted {
                correlation,
                text: text.into(),
            })
            .await;

        let ticket = match outcome {
            Outcome::QuestionIssued(ticket) => ticket,
            Outcome::Ignored(reason) => {
                tracing::debug!("[ChatController] Question ignored: {:?}", reason);
                return Ok(AskOutcome::Ignored(reason));
            }
            other => {
                tracing::debug!("[ChatController] Unexpected submit outcome: {:?}", other);
                return Ok(AskOutcome::Ignored(Ignored::EmptyQuestion));
            }
        };

        tracing::debug!(
            "[ChatController] Asking in conversation {} (correlation={})",
            ticket.conversation_id(),
            ticket.correlation
        );

        match self
            .backend
            .query(&ticket.question, ticket.conversation_id())
            .await
        {
            Ok(answer) => {
                let outcome = self
                    .store
                    .dispatch(Action::AnswerReceived {
                        ticket,
                        answer: answer.into_message(),
                    })
                    .await;
                if outcome == Outcome::Stale {
                    tracing::debug!("[ChatController] Dropped answer for an inactive session");
                    return Ok(AskOutcome::Discarded);
                }
                Ok(AskOutcome::Answered)
            }
            Err(err) => {
                tracing::warn!("[ChatController] Query failed: {}", err);
                self.notifier
                    .error(err.user_message(QUERY_FAILURE_DEFAULT))
                    .await;
                self.store.dispatch(Action::AnswerFailed { ticket }).await;
                Err(err)
            }
        }
    }
}
