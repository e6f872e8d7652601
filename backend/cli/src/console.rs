//! Interactive operator console.
//!
//! Stands in for the chat transport: each stdin line is one operator
//! command, dispatched to completion before the next line is read.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use magpie_commands::CommandDispatcher;
use magpie_core::{
    ControlChannel, InMemoryRoster, RecordingSender, RecordingSession, RosterSnapshot, Services,
};
use magpie_logging::{CommandEvent, EventLogger};

use crate::terminal_output::{format_control, format_status, note_error, note_warn, supports_color};

/// Typing this (or closing stdin) ends the console.
pub const QUIT_COMMAND: &str = "-quit";

/// Control channel that prints reports to stdout.
pub struct StdoutChannel {
    color: bool,
}

impl StdoutChannel {
    pub fn new() -> Self {
        Self { color: supports_color() }
    }

    fn emit(&self, block: String) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{block}").and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write report to stdout");
        }
    }
}

#[async_trait]
impl ControlChannel for StdoutChannel {
    async fn send_control_message(&self, text: &str) {
        self.emit(format_control(text, self.color));
    }

    async fn send_status(&self, text: &str) {
        self.emit(format_status(text, self.color));
    }
}

/// Wire in-memory collaborators around `snapshot`, reporting through `control`.
pub fn build_services(snapshot: RosterSnapshot, control: Arc<dyn ControlChannel>) -> Services {
    let roster = Arc::new(InMemoryRoster::new(snapshot));
    Services {
        control,
        roster: roster.clone(),
        identities: roster.clone(),
        session: Arc::new(RecordingSession::new(roster.clone())),
        sender: Arc::new(RecordingSender::new(roster)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Skipped,
    Handled,
    Unknown,
    Failed(String),
    Quit,
}

pub struct Console {
    dispatcher: CommandDispatcher,
    session_name: String,
}

impl Console {
    pub fn new(dispatcher: CommandDispatcher, session_name: impl Into<String>) -> Self {
        Self { dispatcher, session_name: session_name.into() }
    }

    /// Dispatch one operator line and log the resulting command event.
    pub async fn handle_line(&self, raw: &str) -> LineOutcome {
        let line = raw.trim();
        if line.is_empty() {
            return LineOutcome::Skipped;
        }
        if line == QUIT_COMMAND {
            return LineOutcome::Quit;
        }

        let (outcome, event) = match self.dispatcher.dispatch(line).await {
            Ok(Some(spec)) => (
                LineOutcome::Handled,
                CommandEvent::Matched { line: line.to_string(), pattern: spec.pattern.clone() },
            ),
            Ok(None) => (LineOutcome::Unknown, CommandEvent::Unmatched { line: line.to_string() }),
            Err(e) => {
                let error = format!("{e:#}");
                (
                    LineOutcome::Failed(error.clone()),
                    CommandEvent::Failed { line: line.to_string(), error },
                )
            }
        };
        EventLogger::log_event(&self.session_name, event);
        outcome
    }

    /// Read lines until EOF or [`QUIT_COMMAND`].
    pub async fn run<R: AsyncBufRead + Unpin>(&self, input: R) -> Result<()> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line).await {
                LineOutcome::Quit => break,
                LineOutcome::Unknown => note_warn("Unknown command, try -help"),
                LineOutcome::Failed(error) => note_error(&format!("Command failed: {error}")),
                LineOutcome::Skipped | LineOutcome::Handled => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use magpie_commands::{
        build_default_dispatcher, Captures, CommandContext, CommandHandler, CommandOptions,
        CommandSpec,
    };
    use magpie_core::{Group, RecordingChannel};

    use super::*;

    fn console(control: Arc<RecordingChannel>) -> Console {
        let snapshot = RosterSnapshot {
            groups: Some(vec![Group { id: 2001, gid: 701, name: "rustaceans".into() }]),
            ..RosterSnapshot::default()
        };
        let services = build_services(snapshot, control);
        let dispatcher = build_default_dispatcher(&services, &CommandOptions::default()).unwrap();
        Console::new(dispatcher, "test")
    }

    #[tokio::test]
    async fn classifies_lines() {
        let control = Arc::new(RecordingChannel::new());
        let console = console(control.clone());

        assert_eq!(console.handle_line("   ").await, LineOutcome::Skipped);
        assert_eq!(console.handle_line(" -glist ").await, LineOutcome::Handled);
        assert_eq!(console.handle_line("hello").await, LineOutcome::Unknown);
        assert_eq!(console.handle_line("-quit").await, LineOutcome::Quit);
        assert_eq!(console.handle_line("#9 hi").await, LineOutcome::Handled);

        let reports = control.reports().await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].text(), "Groups\n(2001) rustaceans");
        assert_eq!(reports[1].text(), "9 is not a friend, group or discussion");
    }

    struct Broken;

    #[async_trait]
    impl CommandHandler for Broken {
        async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
            anyhow::bail!("session lost")
        }
    }

    #[tokio::test]
    async fn handler_errors_become_failed_lines() {
        let dispatcher = CommandDispatcher::from_specs([CommandSpec::new("-boom", Arc::new(Broken))]).unwrap();
        let console = Console::new(dispatcher, "test");
        assert_eq!(
            console.handle_line("-boom").await,
            LineOutcome::Failed("session lost".to_string())
        );
    }

    #[tokio::test]
    async fn run_stops_at_quit() {
        let control = Arc::new(RecordingChannel::new());
        let console = console(control.clone());

        let input: &[u8] = b"-glist\n-quit\n-glist\n";
        console.run(input).await.unwrap();
        assert_eq!(control.reports().await.len(), 1);
    }
}
