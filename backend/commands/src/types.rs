/// Command table types.
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::dispatch::CommandHandler;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid command pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern has no capture group {index}")]
    MissingCapture { index: usize },
}

// ---------------------------------------------------------------------------
// Command spec
// ---------------------------------------------------------------------------

/// One entry of the command table.
#[derive(Clone)]
pub struct CommandSpec {
    /// Regular expression source; also the unique key of the entry.
    pub pattern: String,
    /// Shown in help output instead of the raw pattern.
    pub display: Option<String>,
    pub description: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandSpec {
    pub fn new(pattern: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        Self {
            pattern: pattern.into(),
            display: None,
            description: String::new(),
            handler,
        }
    }

    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Display override, or the pattern text if none was declared.
    pub fn label(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.pattern)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("pattern", &self.pattern)
            .field("display", &self.display)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Captures
// ---------------------------------------------------------------------------

/// Groups captured by a successful match.
///
/// Positional captures hold only the unnamed groups, in group order. A group
/// that did not take part in the match is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    positional: Vec<Option<String>>,
    named: BTreeMap<String, Option<String>>,
}

impl Captures {
    pub fn from_match(matcher: &Regex, caps: &regex::Captures<'_>) -> Self {
        let mut captures = Captures::default();
        for (index, name) in matcher.capture_names().enumerate().skip(1) {
            let value = caps.get(index).map(|m| m.as_str().to_string());
            match name {
                Some(name) => {
                    captures.named.insert(name.to_string(), value);
                }
                None => captures.positional.push(value),
            }
        }
        captures
    }

    pub fn positional(&self) -> &[Option<String>] {
        &self.positional
    }

    /// Positional capture `index` (0-based), if it participated.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).and_then(|v| v.as_deref())
    }

    pub fn name(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(|v| v.as_deref())
    }

    /// Like [`Captures::get`], but a group missing from the pattern is an error.
    /// A group that exists but did not participate yields an empty string.
    pub fn require(&self, index: usize) -> Result<&str, CommandError> {
        match self.positional.get(index) {
            Some(value) => Ok(value.as_deref().unwrap_or("")),
            None => Err(CommandError::MissingCapture { index }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(pattern: &str, input: &str) -> Captures {
        let re = Regex::new(pattern).unwrap();
        let caps = re.captures(input).unwrap();
        Captures::from_match(&re, &caps)
    }

    #[test]
    fn named_groups_are_kept_out_of_positional() {
        let caps = capture(r"-send (?P<who>\w+) (\d+)(x)?", "-send bob 12");
        assert_eq!(caps.positional(), &[Some("12".to_string()), None]);
        assert_eq!(caps.name("who"), Some("bob"));
        assert_eq!(caps.get(1), None);
    }

    #[test]
    fn require_distinguishes_missing_from_empty() {
        let caps = capture(r"#(\d+)(.*)", "#42");
        assert_eq!(caps.require(1).unwrap(), "");
        assert!(matches!(caps.require(2), Err(CommandError::MissingCapture { index: 2 })));
    }

    #[test]
    fn label_prefers_display_override() {
        struct Noop;
        #[async_trait::async_trait]
        impl CommandHandler for Noop {
            async fn handle(
                &self,
                _ctx: &crate::dispatch::CommandContext<'_>,
                _captures: &Captures,
            ) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let spec = CommandSpec::new(r"^#(\d+)(.*)", Arc::new(Noop));
        assert_eq!(spec.label(), r"^#(\d+)(.*)");
        assert_eq!(spec.display("#id content").label(), "#id content");
    }
}
