/// The bridge's built-in command table.
///
/// Table order is the matching order: the first pattern that matches a line
/// wins.
use std::sync::Arc;

use magpie_core::{Presence, Services};

use crate::dispatch::CommandDispatcher;
use crate::handlers::{
    AccountQueryHandler, HelpHandler, ListDiscussionsHandler, ListFriendsHandler,
    ListGroupsHandler, RefreshFriendsHandler, RefreshGroupHandler, SendAtHandler, SessionAction,
    SessionHandler,
};
use crate::types::{CommandError, CommandSpec};

/// Knobs for the built-in handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    /// Presences listed by `-list`.
    pub online_presences: Vec<Presence>,
    /// Confirm `#id content` deliveries to the operator.
    pub confirm_sends: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            online_presences: vec![Presence::Online, Presence::Away],
            confirm_sends: true,
        }
    }
}

/// Build the built-in command list, wired to `services`.
pub fn builtin_commands(services: &Services, options: &CommandOptions) -> Vec<CommandSpec> {
    let control = &services.control;
    let session = |action| {
        Arc::new(SessionHandler {
            session: services.session.clone(),
            control: control.clone(),
            action,
        })
    };

    vec![
        CommandSpec::new("-help", Arc::new(HelpHandler { control: control.clone() }))
            .description("Show this command list"),
        CommandSpec::new(
            "-list",
            Arc::new(ListFriendsHandler {
                roster: services.roster.clone(),
                control: control.clone(),
                online: options.online_presences.clone(),
            }),
        )
        .description("List online friends"),
        CommandSpec::new(
            "-glist",
            Arc::new(ListGroupsHandler { roster: services.roster.clone(), control: control.clone() }),
        )
        .description("List groups"),
        CommandSpec::new(
            "-dlist",
            Arc::new(ListDiscussionsHandler {
                roster: services.roster.clone(),
                control: control.clone(),
            }),
        )
        .description("List discussion groups"),
        CommandSpec::new(
            r"^#([0-9]+)(.*)",
            Arc::new(SendAtHandler {
                identities: services.identities.clone(),
                sender: services.sender.clone(),
                control: control.clone(),
                confirm: options.confirm_sends,
            }),
        )
        .display("#id content")
        .description("Send content to the object with unique id `id`"),
        CommandSpec::new(
            r"-qn ([0-9]+)",
            Arc::new(AccountQueryHandler {
                identities: services.identities.clone(),
                roster: services.roster.clone(),
                control: control.clone(),
            }),
        )
        .display("-qn id")
        .description("Look up the QQ number / group number"),
        CommandSpec::new("-restart", session(SessionAction::Restart))
            .description("Sign in to WebQQ again"),
        CommandSpec::new("-stop", session(SessionAction::Stop)).description("Sign out of WebQQ"),
        CommandSpec::new("-start", session(SessionAction::Start)).description("Sign in to WebQQ"),
        CommandSpec::new(
            r"-gr ([0-9]+)",
            Arc::new(RefreshGroupHandler { session: services.session.clone(), control: control.clone() }),
        )
        .display("-gr id")
        .description("Refresh member info of group `id`"),
        CommandSpec::new(
            "-fr",
            Arc::new(RefreshFriendsHandler { session: services.session.clone(), control: control.clone() }),
        )
        .description("Refresh friend info"),
    ]
}

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher(
    services: &Services,
    options: &CommandOptions,
) -> Result<CommandDispatcher, CommandError> {
    CommandDispatcher::from_specs(builtin_commands(services, options))
}
