use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use docuchat_application::DocuChatApp;
use docuchat_core::config::ClientConfig;
use docuchat_interaction::HttpChatBackend;

mod command;
mod helper;
mod render;
mod repl;

use command::ParseError;
use helper::CliHelper;
use repl::Repl;

const LOG_ENV: &str = "DOCUCHAT_LOG";

#[derive(Parser)]
#[command(name = "docuchat")]
#[command(about = "DocuChat - ask questions about your documents", long_about = None)]
struct Cli {
    /// Backend API base URL, e.g. http://localhost:5000/api
    #[arg(long)]
    base_url: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. The returned guard flushes the log file
/// on drop and must live until exit.
fn init_logging(to_stderr: bool) -> Result<Option<WorkerGuard>> {
    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("docuchat").join("logs"))
        .context("Could not determine the local data directory for logs")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "docuchat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::load_from(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_stderr)?;
    let config = load_config(&cli)?;
    tracing::info!("[main] Using backend at {}", config.base_url);

    // ===== Application Initialization =====
    let backend = Arc::new(HttpChatBackend::from_config(&config)?);
    let app = DocuChatApp::new(backend, &config);
    let printer = repl::spawn_notification_printer(app.clone());

    println!("{}", "=== DocuChat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/new' to start a chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    if app.mount().await.is_ok() {
        let state = app.snapshot().await;
        for line in render::registry(&state) {
            println!("{}", render::paint(&line));
        }
    }
    println!();

    let mut repl = Repl::new(app, config.snippet_width);

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let command = match command::parse(&line) {
                    Ok(command) => command,
                    Err(ParseError::Empty) => continue,
                    Err(err) => {
                        println!("{}", err.to_string().yellow());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());

                if !repl.handle(command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    printer.abort();
    Ok(())
}
