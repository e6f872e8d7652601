//! Log Redaction Layer
//!
//! Operator lines can carry private message bodies (`#id content`) or
//! credentials pasted by mistake; both are scrubbed before logging.

use regex::Regex;
use std::sync::LazyLock;

static SEND_AT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\A(#\d+)\D.*").unwrap());
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|((?i:password|passwd|pwd)\s*[=:]\s*\S+)").unwrap()
});

/// Redacts credentials in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]").into_owned()
}

/// Redacts an operator command line: the content of `#id content` is
/// dropped, everything else goes through [`redact_sensitive_data`].
pub fn redact_command_line(line: &str) -> String {
    let line = SEND_AT_RE.replace(line, "$1 [REDACTED_CONTENT]");
    redact_sensitive_data(&line)
}
