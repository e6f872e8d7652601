//! Operator command interpreter.
//!
//! Incoming control lines are matched against an ordered table of regex
//! patterns; the first match runs its handler with the captured groups.

pub mod args;
pub mod builtin;
pub mod dispatch;
pub mod handlers;
pub mod help;
pub mod registry;
pub mod types;

pub use args::{CommandArgs, SendAtArgs, TargetArgs};
pub use builtin::{build_default_dispatcher, builtin_commands, CommandOptions};
pub use dispatch::{CommandContext, CommandDispatcher, CommandHandler};
pub use handlers::{
    AccountQueryHandler, HelpHandler, ListDiscussionsHandler, ListFriendsHandler,
    ListGroupsHandler, RefreshFriendsHandler, RefreshGroupHandler, SendAtHandler, SessionAction,
    SessionHandler,
};
pub use help::{render_help, HELP_TITLE};
pub use registry::{compile_pattern, CommandEntry, CommandRegistry};
pub use types::{Captures, CommandError, CommandSpec};
