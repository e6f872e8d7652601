/// Command table: ordered, compiled command entries.
///
/// Entries are tried in registration order, so narrow patterns must be
/// registered before broad ones that would shadow them.
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::types::{Captures, CommandError, CommandSpec};

/// Compile a command pattern with multi-line and dot-all semantics, anchored
/// at the start of the input. Only a leading prefix has to match unless the
/// pattern anchors its end itself.
pub fn compile_pattern(pattern: &str) -> Result<Regex, CommandError> {
    let build = |source: &str| {
        RegexBuilder::new(source)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| CommandError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    };

    // Validate the raw text first: wrapping can balance a stray `)`.
    build(pattern)?;
    build(&format!(r"\A(?:{pattern})"))
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CommandEntry {
    spec: CommandSpec,
    matcher: Regex,
}

impl CommandEntry {
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Match `line` against this entry and collect its captures.
    pub fn captures(&self, line: &str) -> Option<Captures> {
        self.matcher
            .captures(line)
            .map(|caps| Captures::from_match(&self.matcher, &caps))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a declarative list of commands. Fails on the first
    /// invalid pattern.
    pub fn from_specs(specs: impl IntoIterator<Item = CommandSpec>) -> Result<Self, CommandError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Register a command.
    ///
    /// Pattern text is the key: registering an identical pattern again
    /// replaces the earlier entry in its original slot.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), CommandError> {
        let matcher = compile_pattern(&spec.pattern)?;

        if let Some(existing) = self.entries.iter_mut().find(|e| e.spec.pattern == spec.pattern) {
            debug!(pattern = %spec.pattern, "[Commands] Replacing command");
            *existing = CommandEntry { spec, matcher };
        } else {
            debug!(pattern = %spec.pattern, "[Commands] Registered command");
            self.entries.push(CommandEntry { spec, matcher });
        }
        Ok(())
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, in table order, whose pattern matches `line`.
    pub fn find(&self, line: &str) -> Option<(&CommandEntry, Captures)> {
        self.entries
            .iter()
            .find_map(|entry| entry.captures(line).map(|caps| (entry, caps)))
    }
}
