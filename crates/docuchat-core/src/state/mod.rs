//! Client state container.
//!
//! All view state lives in one [`ChatState`] value. It is only ever changed by
//! feeding an [`Action`] to [`reduce`], which keeps every transition a pure,
//! synchronous function that can be tested without a backend.
//!
//! # Module Structure
//!
//! - `model`: The state value (`ChatState`, `SessionState`, `Transcript`)
//! - `action`: Inputs and results of a transition (`Action`, `Outcome`)
//! - `reducer`: The transition function (`reduce`)

mod action;
mod model;
mod reducer;

pub use action::{Action, Ignored, Outcome, QuestionTicket};
pub use model::{ChatState, SessionState, SessionTicket, Transcript, TranscriptEntry};
pub use reducer::reduce;
