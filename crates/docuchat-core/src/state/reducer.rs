//! The transition function.

use super::action::{Action, Ignored, Outcome, QuestionTicket};
use super::model::{ChatState, SessionState, SessionTicket, Transcript};
use crate::conversation::{ConversationId, Message, MessageId};
use crate::notification::{LiveNotification, NotificationId};

/// Applies one action to the state.
pub fn reduce(state: &mut ChatState, action: Action) -> Outcome {
    match action {
        Action::ConversationsLoaded(conversations) => {
            state.conversations = conversations;
            Outcome::Changed
        }
        Action::SessionStarted(id) => {
            activate(state, id, Transcript::new());
            Outcome::Changed
        }
        Action::SessionLoaded { id, messages } => {
            activate(state, id, Transcript::from_messages(messages));
            Outcome::Changed
        }
        Action::FileSelected(file) => {
            if !state.session.is_active() {
                return Outcome::Ignored(Ignored::NoActiveSession);
            }
            state.pending_file = Some(file);
            Outcome::Changed
        }
        Action::UploadStarted => set_uploading(state, true),
        Action::UploadSettled => set_uploading(state, false),
        Action::QuestionEdited(text) => {
            if state.question == text {
                return Outcome::Unchanged;
            }
            state.question = text;
            Outcome::Changed
        }
        Action::QuestionSubmitted { correlation, text } => {
            submit_question(state, correlation, text)
        }
        Action::AnswerReceived { ticket, answer } => {
            settle_question(state, &ticket);
            if !is_current(state, &ticket) {
                return Outcome::Stale;
            }
            state.transcript.push(MessageId::new(), answer);
            Outcome::Changed
        }
        Action::AnswerFailed { ticket } => {
            settle_question(state, &ticket);
            if !is_current(state, &ticket) {
                return Outcome::Stale;
            }
            state.transcript.remove(ticket.correlation);
            Outcome::Changed
        }
        Action::NotificationShown(notification) => {
            state.notification_seq += 1;
            let id = NotificationId(state.notification_seq);
            state.notification = Some(LiveNotification { id, notification });
            Outcome::NotificationShown(id)
        }
        Action::NotificationExpired(id) => match &state.notification {
            Some(live) if live.id == id => {
                state.notification = None;
                Outcome::Changed
            }
            _ => Outcome::Unchanged,
        },
    }
}

fn activate(state: &mut ChatState, id: ConversationId, transcript: Transcript) {
    state.epoch += 1;
    state.session = SessionState::Active(SessionTicket {
        conversation_id: id,
        epoch: state.epoch,
    });
    state.transcript = transcript;
    state.pending_file = None;
}

fn set_uploading(state: &mut ChatState, uploading: bool) -> Outcome {
    if state.is_uploading == uploading {
        return Outcome::Unchanged;
    }
    state.is_uploading = uploading;
    Outcome::Changed
}

fn submit_question(state: &mut ChatState, correlation: MessageId, question: String) -> Outcome {
    if question.trim().is_empty() {
        return Outcome::Ignored(Ignored::EmptyQuestion);
    }
    let Some(session) = state.session.ticket() else {
        return Outcome::Ignored(Ignored::NoActiveSession);
    };

    state.question.clear();
    state
        .transcript
        .push(correlation, Message::user(question.clone()));
    state.pending_question = Some(correlation);

    Outcome::QuestionIssued(QuestionTicket {
        correlation,
        session,
        question,
    })
}

fn settle_question(state: &mut ChatState, ticket: &QuestionTicket) {
    if state.pending_question == Some(ticket.correlation) {
        state.pending_question = None;
    }
}

fn is_current(state: &ChatState, ticket: &QuestionTicket) -> bool {
    state.session.ticket() == Some(ticket.session)
}
