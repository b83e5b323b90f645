//! Executes parsed commands against the application.

use colored::Colorize;
use docuchat_application::DocuChatApp;
use docuchat_application::chat::AskOutcome;
use docuchat_core::display::EMPTY_SESSION_PLACEHOLDER;
use docuchat_core::state::Ignored;
use tokio::task::JoinHandle;

use crate::command::Command;
use crate::render::{self, Disclosure, Line};

pub struct Repl {
    app: DocuChatApp,
    disclosure: Disclosure,
    snippet_width: usize,
}

impl Repl {
    pub fn new(app: DocuChatApp, snippet_width: usize) -> Self {
        Self {
            app,
            disclosure: Disclosure::new(),
            snippet_width,
        }
    }

    /// Runs one command. Returns `false` when the REPL should exit.
    ///
    /// Failures are reported by the notification printer, so errors are
    /// only logged here.
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Help => print_lines(&render::help()),
            Command::New => {
                if self.app.sessions().start_new().await.is_ok() {
                    self.disclosure.reset();
                    self.show().await;
                }
            }
            Command::List => {
                let _ = self.app.registry().refresh().await;
                let state = self.app.snapshot().await;
                print_lines(&render::registry(&state));
            }
            Command::Open(id) => {
                if self.app.sessions().select(id).await.is_ok() {
                    self.disclosure.reset();
                    self.show().await;
                }
            }
            Command::File(path) => {
                if !path.is_file() {
                    println!("{}", format!("No such file: {}", path.display()).red());
                } else if let Ok(file) = self.app.uploads().select_file(path).await {
                    let state = self.app.snapshot().await;
                    print_lines(&render::status(&state));
                    tracing::debug!("[Repl] Pending file is now {}", file.name);
                }
            }
            Command::Upload => {
                let can_upload = self.app.store().read(|state| state.can_upload()).await;
                if can_upload {
                    println!("{}", docuchat_core::display::UPLOADING_LABEL.bright_black());
                }
                let _ = self.app.uploads().submit().await;
            }
            Command::Sources(position) => {
                let state = self.app.snapshot().await;
                match self.disclosure.toggle(&state, position) {
                    Ok((entry, expanded)) => print_lines(&render::message(
                        position,
                        &entry.message,
                        expanded,
                        self.snippet_width,
                    )),
                    Err(reason) => println!("{}", reason.red()),
                }
            }
            Command::Show => self.show().await,
            Command::Ask(text) => self.ask(text).await,
        }
        true
    }

    async fn ask(&mut self, text: String) {
        println!("{}", "Thinking...".bright_black());
        match self.app.chat().ask(text).await {
            Ok(AskOutcome::Answered) => {
                let state = self.app.snapshot().await;
                let position = state.transcript.len();
                if let Some(entry) = state.transcript.iter().last() {
                    print_lines(&render::message(
                        position,
                        &entry.message,
                        self.disclosure.is_expanded(entry.id),
                        self.snippet_width,
                    ));
                }
            }
            Ok(AskOutcome::Ignored(Ignored::NoActiveSession)) => {
                println!("{}", EMPTY_SESSION_PLACEHOLDER.bright_black());
            }
            Ok(AskOutcome::Ignored(Ignored::EmptyQuestion)) | Ok(AskOutcome::Discarded) => {}
            Err(err) => tracing::debug!("[Repl] Question failed: {}", err),
        }
    }

    async fn show(&self) {
        let state = self.app.snapshot().await;
        print_lines(&render::transcript(
            &state,
            &self.disclosure,
            self.snippet_width,
        ));
    }
}

fn print_lines(lines: &[Line]) {
    for line in lines {
        println!("{}", render::paint(line));
    }
}

/// Prints every notification once, as soon as it is shown.
pub fn spawn_notification_printer(app: DocuChatApp) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut changes = app.subscribe();
        let mut last_printed = None;

        while changes.changed().await.is_ok() {
            let live = app.store().read(|state| state.notification.clone()).await;
            let Some(live) = live else {
                continue;
            };
            if last_printed == Some(live.id) {
                continue;
            }
            last_printed = Some(live.id);
            println!("{}", render::paint(&render::notification(&live.notification)));
        }
    })
}
