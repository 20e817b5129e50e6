//! Terminal surface: argument parsing and the interactive chat loop.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::agent_core::ChatSession;
use crate::commands::{self, AppState};

#[derive(Parser)]
#[command(name = "ethics-assistant")]
#[command(version, about = "Chat with a hosted model and review research applications against ethics guidelines", long_about = None)]
pub struct Cli {
    /// Path to ethics-assistant.yaml. Defaults to $ETHICS_ASSISTANT_CONFIG or a search upward from the cwd.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show, save or list the API key and deployment URL.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Ask a single question in a fresh session.
    Ask {
        /// The question.
        text: String,
    },

    /// Review a PDF or DOCX research application.
    Analyze {
        /// Path to the document.
        file: PathBuf,
    },

    /// Start an interactive chat (default).
    Chat,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the configuration new sessions will use.
    Show,

    /// Save a new API key and deployment URL.
    Save {
        #[arg(long)]
        api_key: String,

        #[arg(long)]
        deployment_url: String,
    },

    /// List saved configurations, newest first.
    History {
        /// Maximum number of rows to show.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

/// Run one top-level command against `state`.
pub async fn execute(command: Command, state: &AppState) -> Result<()> {
    let mut out = std::io::stdout();
    match command {
        Command::Config { action } => execute_config(action, state, &mut out),
        Command::Ask { text } => {
            let mut session = commands::settings::start_session(state).map_err(|e| anyhow!(e))?;
            let reply = commands::chat::send_message(state, &mut session, &text)
                .await
                .map_err(|e| anyhow!(e))?;
            writeln!(out, "{reply}")?;
            Ok(())
        }
        Command::Analyze { file } => {
            let mut session = commands::settings::start_session(state).map_err(|e| anyhow!(e))?;
            let preview = commands::document::upload_document(state, &mut session, &file)
                .map_err(|e| anyhow!(e))?;
            writeln!(out, "File loaded: {} ({} characters)", preview.filename, preview.char_count)?;
            writeln!(out, "{}\n", preview.preview)?;
            let reply = commands::document::analyze_document(state, &mut session)
                .await
                .map_err(|e| anyhow!(e))?;
            writeln!(out, "Assistant: {reply}")?;
            Ok(())
        }
        Command::Chat => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            run_chat(state, stdin, &mut out).await
        }
    }
}

fn execute_config(action: ConfigAction, state: &AppState, out: &mut impl Write) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let session = commands::settings::start_session(state).map_err(|e| anyhow!(e))?;
            let info = commands::settings::get_configuration(&session);
            if info.configured {
                writeln!(out, "API key:        {} ({})", info.masked_key, info.key_fingerprint)?;
                writeln!(out, "Deployment URL: {}", info.deployment_url)?;
            } else {
                writeln!(out, "Not configured. Run `ethics-assistant config save`.")?;
            }
        }
        ConfigAction::Save {
            api_key,
            deployment_url,
        } => {
            let mut session = commands::settings::start_session(state).map_err(|e| anyhow!(e))?;
            commands::settings::save_configuration(state, &mut session, api_key, deployment_url)
                .map_err(|e| anyhow!(e))?;
            writeln!(out, "Configuration saved.")?;
        }
        ConfigAction::History { limit } => {
            let rows = commands::settings::list_configuration_history(state, limit)
                .map_err(|e| anyhow!(e))?;
            for row in rows {
                writeln!(out, "#{:<4} {}  {}", row.id, row.masked_key, row.deployment_url)?;
            }
        }
    }
    Ok(())
}

// ─── Interactive loop ────────────────────────────────────────────────────────

/// A parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Message(String),
    Upload(PathBuf),
    Analyze,
    History,
    Config {
        api_key: String,
        deployment_url: String,
    },
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Message(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "upload" if !arg.is_empty() => ReplCommand::Upload(PathBuf::from(arg)),
            "upload" => ReplCommand::Invalid("usage: /upload <path>".into()),
            "analyze" => ReplCommand::Analyze,
            "history" => ReplCommand::History,
            "config" => match arg.split_once(char::is_whitespace) {
                Some((key, url)) => ReplCommand::Config {
                    api_key: key.to_string(),
                    deployment_url: url.trim().to_string(),
                },
                None => ReplCommand::Invalid("usage: /config <api-key> <deployment-url>".into()),
            },
            "help" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("unknown command /{other}, try /help")),
        }
    }
}

const HELP: &str = "\
Type a question to chat, or:
  /upload <path>              load a PDF or DOCX research application
  /analyze                    review the loaded document
  /history                    show the conversation
  /config <key> <url>         save API key and deployment URL
  /quit                       exit";

/// Read lines from `input` until EOF or `/quit`. Failures are printed and
/// the loop continues.
pub async fn run_chat<R, W>(state: &AppState, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session = commands::settings::start_session(state).map_err(|e| anyhow!(e))?;
    if !commands::settings::get_configuration(&session).configured {
        writeln!(out, "No API configuration saved yet. Use /config <key> <url>.")?;
    }
    writeln!(out, "Ask about human ethics, or /help for commands.")?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            command => handle_repl_command(state, &mut session, command, out).await?,
        }
    }

    tracing::info!(
        session_id = %session.id(),
        started_at = %session.started_at(),
        turns = session.history().len(),
        "chat ended"
    );
    Ok(())
}

async fn handle_repl_command<W: Write>(
    state: &AppState,
    session: &mut ChatSession,
    command: ReplCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        ReplCommand::Message(text) => {
            match commands::chat::send_message(state, session, &text).await {
                Ok(reply) => writeln!(out, "Assistant: {reply}")?,
                Err(e) => writeln!(out, "Error: {e}")?,
            }
        }
        ReplCommand::Upload(path) => {
            match commands::document::upload_document(state, session, &path) {
                Ok(preview) => {
                    writeln!(out, "File loaded: {} ({} characters)", preview.filename, preview.char_count)?;
                    writeln!(out, "{}", preview.preview)?;
                }
                Err(e) => writeln!(out, "Error: {e}")?,
            }
        }
        ReplCommand::Analyze => match commands::document::analyze_document(state, session).await {
            Ok(reply) => writeln!(out, "Assistant: {reply}")?,
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ReplCommand::History => {
            let history = commands::chat::get_history(session);
            if history.is_empty() {
                writeln!(out, "(no messages yet)")?;
            } else {
                let turns: Vec<String> = history
                    .iter()
                    .map(|item| {
                        let speaker = if item.role == "user" { "You" } else { "Assistant" };
                        format!("{speaker}: {}", item.content)
                    })
                    .collect();
                writeln!(out, "{}", turns.join("\n\n"))?;
            }
        }
        ReplCommand::Config {
            api_key,
            deployment_url,
        } => match commands::settings::save_configuration(state, session, api_key, deployment_url)
        {
            Ok(_) => writeln!(out, "Configuration saved.")?,
            Err(e) => writeln!(out, "Error: {e}")?,
        },
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Invalid(msg) => writeln!(out, "{msg}")?,
        ReplCommand::Quit | ReplCommand::Empty => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use mockito::Server;

    use super::*;
    use crate::commands::test_support::state_for;

    #[test]
    fn test_parse_repl_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Empty);
        assert_eq!(
            ReplCommand::parse("Does this meet NEAC guidelines?"),
            ReplCommand::Message("Does this meet NEAC guidelines?".into())
        );
        assert_eq!(
            ReplCommand::parse("/upload ./app form.pdf"),
            ReplCommand::Upload(PathBuf::from("./app form.pdf"))
        );
        assert!(matches!(ReplCommand::parse("/upload"), ReplCommand::Invalid(_)));
        assert_eq!(ReplCommand::parse("/analyze"), ReplCommand::Analyze);
        assert_eq!(
            ReplCommand::parse("/config key https://host/chat"),
            ReplCommand::Config {
                api_key: "key".into(),
                deployment_url: "https://host/chat".into()
            }
        );
        assert!(matches!(ReplCommand::parse("/config key"), ReplCommand::Invalid(_)));
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert!(matches!(ReplCommand::parse("/nope"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn test_cli_parses_config_save() {
        let cli = Cli::try_parse_from([
            "ethics-assistant",
            "config",
            "save",
            "--api-key",
            "k",
            "--deployment-url",
            "https://host/chat",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Config {
                action: ConfigAction::Save { api_key, deployment_url },
            }) => {
                assert_eq!(api_key, "k");
                assert_eq!(deployment_url, "https://host/chat");
            }
            _ => panic!("expected config save"),
        }
    }

    #[test]
    fn test_cli_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["ethics-assistant"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn test_chat_loop_configures_and_chats() {
        let mut server = Server::new_async().await;
        let _token = server
            .mock("POST", "/identity/token")
            .with_status(200)
            .with_body(r#"{"access_token":"tok"}"#)
            .create_async()
            .await;
        let _chat = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Hi there"}}]}"#)
            .create_async()
            .await;

        let state = state_for(&server.url());
        let script = format!(
            "/config my-key {}/chat\nHello\n/history\n/analyze\n/quit\nnever sent\n",
            server.url()
        );
        let mut out = Vec::new();
        run_chat(&state, script.as_bytes(), &mut out).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Configuration saved."));
        assert!(printed.contains("Assistant: Hi there"));
        assert!(printed.contains("You: Hello\n\nAssistant: Hi there\n"));
        assert!(printed.contains("Error: no document loaded"));
        assert!(!printed.contains("never sent"));
    }
}
