//! Structured logging for the magpie bridge.
//!
//! Subscriber setup with a rolling JSON file, redaction of operator lines,
//! and structured command events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CommandEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, LOG_FILE_NAME};
pub use redact::{redact_command_line, redact_sensitive_data};
