/// Command dispatch: route operator lines to the first matching handler.
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::help::render_help;
use crate::registry::CommandRegistry;
use crate::types::{Captures, CommandError, CommandSpec};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
///
/// Handlers see the command table read-only; they cannot reach the
/// dispatcher, so no handler can re-enter `parse`.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub registry: &'a CommandRegistry,
    pub line: &'a str,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext<'_>, captures: &Captures) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Single-threaded, non-reentrant dispatcher. Callers serialise access to
/// whatever shared state the handlers touch.
#[derive(Debug)]
pub struct CommandDispatcher {
    registry: CommandRegistry,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn from_specs(specs: impl IntoIterator<Item = CommandSpec>) -> Result<Self, CommandError> {
        CommandRegistry::from_specs(specs).map(Self::new)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run the first command matching `line` and return its spec.
    ///
    /// `Ok(None)` means nothing matched. Handler errors are returned as-is.
    pub async fn dispatch(&self, line: &str) -> Result<Option<&CommandSpec>> {
        let Some((entry, captures)) = self.registry.find(line) else {
            debug!("[Commands] No command matched");
            return Ok(None);
        };

        let spec = entry.spec();
        info!(pattern = %spec.pattern, "[Commands] Dispatching");
        let ctx = CommandContext { registry: &self.registry, line };
        spec.handler.handle(&ctx, &captures).await?;
        Ok(Some(spec))
    }

    /// `true` if some command handled `line`.
    pub async fn parse(&self, line: &str) -> Result<bool> {
        Ok(self.dispatch(line).await?.is_some())
    }

    pub fn help(&self) -> String {
        render_help(&self.registry)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::bail;
    use tokio::sync::Mutex;

    use super::*;

    /// Records every invocation with its captures.
    struct Recorder {
        name: &'static str,
        calls: Arc<Mutex<Vec<(&'static str, Captures)>>>,
    }

    #[async_trait]
    impl CommandHandler for Recorder {
        async fn handle(&self, _ctx: &CommandContext<'_>, captures: &Captures) -> Result<()> {
            self.calls.lock().await.push((self.name, captures.clone()));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl CommandHandler for Failing {
        async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
            bail!("collaborator exploded")
        }
    }

    fn recorder(
        pattern: &str,
        name: &'static str,
        calls: &Arc<Mutex<Vec<(&'static str, Captures)>>>,
    ) -> CommandSpec {
        CommandSpec::new(pattern, Arc::new(Recorder { name, calls: calls.clone() }))
    }

    #[tokio::test]
    async fn only_the_matching_handler_runs() {
        let calls = Arc::default();
        let dispatcher = CommandDispatcher::from_specs([
            recorder("-stop", "stop", &calls),
            recorder("-start", "start", &calls),
        ])
        .unwrap();

        assert!(dispatcher.parse("-start").await.unwrap());
        let calls = calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "start");
    }

    #[tokio::test]
    async fn positional_and_named_captures_reach_the_handler() {
        let calls = Arc::default();
        let dispatcher = CommandDispatcher::from_specs([
            recorder(r"^#(\d+)(.*)", "at", &calls),
            recorder(r"-say (?P<who>\w+) (.*)", "say", &calls),
        ])
        .unwrap();

        assert!(dispatcher.parse("#42 hello").await.unwrap());
        assert!(dispatcher.parse("-say bob hi there").await.unwrap());

        let calls = calls.lock().await;
        assert_eq!(
            calls[0].1.positional(),
            &[Some("42".to_string()), Some(" hello".to_string())]
        );
        assert_eq!(calls[1].1.name("who"), Some("bob"));
        assert_eq!(calls[1].1.positional(), &[Some("hi there".to_string())]);
    }

    #[tokio::test]
    async fn dispatch_reports_the_matched_spec() {
        let calls = Arc::default();
        let dispatcher = CommandDispatcher::from_specs([recorder(r"-qn (\d+)", "qn", &calls)]).unwrap();

        let spec = dispatcher.dispatch("-qn 1001").await.unwrap().unwrap();
        assert_eq!(spec.pattern, r"-qn (\d+)");
        assert!(dispatcher.dispatch("-qn").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_input_is_not_an_error() {
        let calls = Arc::default();
        let dispatcher = CommandDispatcher::from_specs([recorder("-help", "help", &calls)]).unwrap();

        assert!(!dispatcher.parse("unknown text").await.unwrap());
        assert!(calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn handler_errors_propagate() {
        let dispatcher = CommandDispatcher::from_specs([CommandSpec::new("-boom", Arc::new(Failing))]).unwrap();

        let err = dispatcher.parse("-boom").await.unwrap_err();
        assert!(err.to_string().contains("collaborator exploded"));
    }
}
