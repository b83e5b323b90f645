//! Turns the client state into terminal lines.
//!
//! Rendering is split in two steps: the functions here build plain [`Line`]s
//! tagged with a [`Tone`], and [`paint`] applies colour. Tests only look at
//! the first step.

use std::collections::HashSet;

use colored::{ColoredString, Colorize};
use docuchat_core::conversation::{Message, MessageId};
use docuchat_core::display::{
    self, EMPTY_SESSION_PLACEHOLDER, pending_file_label, sources_summary, upload_label,
};
use docuchat_core::notification::{Notification, NotificationKind};
use docuchat_core::state::{ChatState, TranscriptEntry};

use crate::command::COMMANDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    User,
    Ai,
    Source,
    Muted,
    Active,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

pub fn paint(line: &Line) -> ColoredString {
    let text = line.text.as_str();
    match line.tone {
        Tone::Heading => text.bright_magenta().bold(),
        Tone::User => text.green(),
        Tone::Ai => text.bright_blue(),
        Tone::Source => text.cyan(),
        Tone::Muted => text.bright_black(),
        Tone::Active => text.bright_yellow().bold(),
        Tone::Success => text.bright_green(),
        Tone::Error => text.red(),
    }
}

/// Which messages have their citation list expanded.
///
/// Every message toggles independently; all collapse when the session changes.
#[derive(Debug, Default)]
pub struct Disclosure {
    expanded: HashSet<MessageId>,
}

impl Disclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: MessageId) -> bool {
        self.expanded.contains(&id)
    }

    /// Toggles the sources of the `position`-th message (1-based).
    ///
    /// Returns the entry and whether it is now expanded.
    pub fn toggle<'a>(
        &mut self,
        state: &'a ChatState,
        position: usize,
    ) -> Result<(&'a TranscriptEntry, bool), String> {
        let entry = position
            .checked_sub(1)
            .and_then(|index| state.transcript.get(index))
            .ok_or_else(|| format!("There is no message {position}"))?;
        if entry.message.is_user() || !entry.message.has_sources() {
            return Err(format!("Message {position} has no sources"));
        }

        let expanded = if self.expanded.remove(&entry.id) {
            false
        } else {
            self.expanded.insert(entry.id);
            true
        };
        Ok((entry, expanded))
    }

    pub fn reset(&mut self) {
        self.expanded.clear();
    }
}

/// Lines for one transcript message. `position` is 1-based.
pub fn message(position: usize, message: &Message, expanded: bool, width: usize) -> Vec<Line> {
    let (tone, speaker) = if message.is_user() {
        (Tone::User, "You")
    } else {
        (Tone::Ai, "AI")
    };

    let mut lines: Vec<Line> = message
        .text
        .lines()
        .enumerate()
        .map(|(i, text)| {
            if i == 0 {
                Line::new(tone, format!("[{position}] {speaker}: {text}"))
            } else {
                Line::new(tone, format!("    {text}"))
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::new(tone, format!("[{position}] {speaker}:")));
    }

    if !message.is_user() && message.has_sources() {
        let summary = sources_summary(message.sources.len());
        if expanded {
            lines.push(Line::new(Tone::Source, format!("    v {summary}")));
            lines.extend(message.sources.iter().map(|source| {
                Line::new(
                    Tone::Source,
                    format!("      {}", display::source_line(source, width)),
                )
            }));
        } else {
            lines.push(Line::new(
                Tone::Muted,
                format!("    > {summary}  (/sources {position})"),
            ));
        }
    }
    lines
}

/// The active conversation with its messages, or the placeholder.
pub fn transcript(state: &ChatState, disclosure: &Disclosure, width: usize) -> Vec<Line> {
    let Some(id) = state.active_conversation() else {
        return vec![Line::new(Tone::Muted, EMPTY_SESSION_PLACEHOLDER)];
    };

    let mut lines = vec![Line::new(Tone::Heading, format!("=== Chat #{id} ==="))];
    for (index, entry) in state.transcript.iter().enumerate() {
        lines.extend(message(
            index + 1,
            &entry.message,
            disclosure.is_expanded(entry.id),
            width,
        ));
    }
    if state.transcript.is_empty() {
        lines.push(Line::new(Tone::Muted, "No messages yet. Type a question."));
    }
    lines.extend(status(state));
    lines
}

/// Pending file and upload control.
pub fn status(state: &ChatState) -> Vec<Line> {
    if state.active_conversation().is_none() {
        return vec![];
    }
    match &state.pending_file {
        Some(file) => vec![Line::new(
            Tone::Muted,
            format!(
                "{}  [{}]",
                pending_file_label(file),
                upload_label(state.is_uploading)
            ),
        )],
        None => vec![Line::new(
            Tone::Muted,
            "No document selected (/file <path>)",
        )],
    }
}

/// Conversation list, newest first as the backend returns it.
pub fn registry(state: &ChatState) -> Vec<Line> {
    let mut lines = vec![Line::new(Tone::Heading, "Conversations")];
    if state.conversations.is_empty() {
        lines.push(Line::new(Tone::Muted, "  (none yet, /new starts one)"));
        return lines;
    }

    let active = state.active_conversation();
    for conversation in &state.conversations {
        let created = conversation
            .created_at_parsed()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| conversation.created_at.clone());
        if Some(conversation.id) == active {
            lines.push(Line::new(
                Tone::Active,
                format!("* {}  {}", conversation.label(), created),
            ));
        } else {
            lines.push(Line::new(
                Tone::Muted,
                format!("  {}  {}", conversation.label(), created),
            ));
        }
    }
    lines
}

pub fn notification(notification: &Notification) -> Line {
    match notification.kind {
        NotificationKind::Success => Line::new(Tone::Success, format!("✓ {}", notification.text)),
        NotificationKind::Error => Line::new(Tone::Error, format!("✗ {}", notification.text)),
    }
}

pub fn help() -> Vec<Line> {
    let mut lines = vec![Line::new(Tone::Heading, "Commands")];
    lines.extend(
        COMMANDS
            .iter()
            .map(|(name, usage)| Line::new(Tone::Muted, format!("  {name:<10} {usage}"))),
    );
    lines.push(Line::new(Tone::Muted, "  quit       Exit"));
    lines.push(Line::new(
        Tone::Muted,
        "Anything else is asked as a question in the active conversation.",
    ));
    lines
}
