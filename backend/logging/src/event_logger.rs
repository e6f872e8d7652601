//! Command Event Logger
//!
//! Every operator line ends in one structured event (matched, unmatched or
//! failed), emitted under the `command_events` target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::{redact_command_line, redact_sensitive_data};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandEvent {
    Matched { line: String, pattern: String },
    Unmatched { line: String },
    Failed { line: String, error: String },
}

impl CommandEvent {
    fn redacted(self) -> Self {
        match self {
            CommandEvent::Matched { line, pattern } => {
                CommandEvent::Matched { line: redact_command_line(&line), pattern }
            }
            CommandEvent::Unmatched { line } => {
                CommandEvent::Unmatched { line: redact_command_line(&line) }
            }
            CommandEvent::Failed { line, error } => CommandEvent::Failed {
                line: redact_command_line(&line),
                error: redact_sensitive_data(&error),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session: String,
    pub timestamp: DateTime<Utc>,
    pub event: CommandEvent,
}

impl EventLogEntry {
    pub fn new(session: &str, event: CommandEvent) -> Self {
        Self {
            session: session.to_string(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Redact and emit a command event.
    pub fn log_event(session: &str, event: CommandEvent) -> EventLogEntry {
        let entry = EventLogEntry::new(session, event);
        match &entry.event {
            CommandEvent::Failed { .. } => {
                warn!(target: "command_events", event = ?entry, "Command failed")
            }
            _ => info!(target: "command_events", event = ?entry, "Command event"),
        }
        entry
    }
}
