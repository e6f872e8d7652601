/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler`. They
/// forward their typed arguments to the injected collaborators and send one
/// report back to the operator.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use magpie_core::{
    Category, ControlChannel, Friend, IdKind, IdentityResolver, MessageSender, Presence,
    RosterService, SessionController,
};

use crate::args::{CommandArgs, SendAtArgs, TargetArgs};
use crate::dispatch::{CommandContext, CommandHandler};
use crate::help::render_help;
use crate::types::Captures;

fn invalid_id(raw: &str) -> String {
    format!("{raw} is not a valid id")
}

// ---------------------------------------------------------------------------
// -help
// ---------------------------------------------------------------------------

pub struct HelpHandler {
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        self.control.send_control_message(&render_help(ctx.registry)).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// -list
// ---------------------------------------------------------------------------

pub struct ListFriendsHandler {
    pub roster: Arc<dyn RosterService>,
    pub control: Arc<dyn ControlChannel>,
    /// Presences that count as "online" for the listing.
    pub online: Vec<Presence>,
}

fn display_nick(friend: &Friend) -> String {
    match &friend.mark_name {
        Some(mark) => format!("{}({})", mark, friend.nick),
        None => friend.nick.clone(),
    }
}

#[async_trait]
impl CommandHandler for ListFriendsHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        let friends = self.roster.friends().await?;

        let mut categories: Vec<(&Category, Vec<&Friend>)> =
            friends.categories.iter().map(|c| (c, Vec::new())).collect();
        categories.sort_by_key(|(c, _)| (c.sort, c.index));
        debug!(categories = categories.len(), "[Commands] Friend categories loaded");

        for friend in friends.info.iter().filter(|f| self.online.contains(&f.presence)) {
            match categories.iter_mut().find(|(c, _)| c.index == friend.category) {
                Some((_, members)) => members.push(friend),
                None => warn!(
                    nick = %friend.nick,
                    category = friend.category,
                    "[Commands] Friend belongs to an unknown category"
                ),
            }
        }

        let mut lines = vec!["Online friends".to_string()];
        for (category, members) in &categories {
            lines.push(format!("== {} ==", category.name));
            for friend in members {
                lines.push(format!("({}){}[{}]", friend.id, display_nick(friend), friend.presence));
            }
        }

        self.control.send_control_message(&lines.join("\n")).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// -glist, -dlist
// ---------------------------------------------------------------------------

pub struct ListGroupsHandler {
    pub roster: Arc<dyn RosterService>,
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for ListGroupsHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        let mut lines = vec!["Groups".to_string()];
        if let Some(groups) = self.roster.groups().await? {
            lines.extend(groups.groups.iter().map(|g| format!("({}) {}", g.id, g.name)));
        }
        self.control.send_control_message(&lines.join("\n")).await;
        Ok(())
    }
}

pub struct ListDiscussionsHandler {
    pub roster: Arc<dyn RosterService>,
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for ListDiscussionsHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        let mut lines = vec!["Discussion groups".to_string()];
        if let Some(discussions) = self.roster.discussions().await? {
            lines.extend(discussions.discus.iter().map(|d| format!("({}) {}", d.id, d.name)));
        }
        self.control.send_control_message(&lines.join("\n")).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// #id content
// ---------------------------------------------------------------------------

pub struct SendAtHandler {
    pub identities: Arc<dyn IdentityResolver>,
    pub sender: Arc<dyn MessageSender>,
    pub control: Arc<dyn ControlChannel>,
    /// Confirm each delivery to the operator.
    pub confirm: bool,
}

#[async_trait]
impl CommandHandler for SendAtHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, captures: &Captures) -> Result<()> {
        let args = SendAtArgs::from_captures(captures)?;
        let Some(id) = args.target.numeric() else {
            self.control.send_control_message(&invalid_id(&args.target.raw)).await;
            return Ok(());
        };
        if self.identities.resolve(id).await?.is_none() {
            debug!(id, "[Commands] Send target did not resolve");
            let text = format!("{} is not a friend, group or discussion", args.target.raw);
            self.control.send_control_message(&text).await;
            return Ok(());
        }

        self.sender.send_message_to(id, &args.content).await?;
        if self.confirm {
            self.control.send_control_message(&format!("[S] Sent to {id}")).await;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// -qn id
// ---------------------------------------------------------------------------

pub struct AccountQueryHandler {
    pub identities: Arc<dyn IdentityResolver>,
    pub roster: Arc<dyn RosterService>,
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for AccountQueryHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, captures: &Captures) -> Result<()> {
        let args = TargetArgs::from_captures(captures)?;
        let resolved = match args.numeric() {
            Some(id) => self.identities.resolve(id).await?,
            None => None,
        };

        let (resolved, phrase, name) = match resolved {
            Some(resolved) if resolved.kind == IdKind::Friend => {
                let friends = self.roster.friends().await?;
                let name = friends.show_name(resolved.underlying).map(str::to_string);
                (resolved, "QQ number", name)
            }
            Some(resolved) if resolved.kind == IdKind::Group => {
                let groups = self.roster.groups().await?;
                let name = groups
                    .as_ref()
                    .and_then(|g| g.group_name(resolved.underlying))
                    .map(str::to_string);
                (resolved, "group number", name)
            }
            _ => {
                let text = format!("{} is neither a group nor a friend", args.raw);
                self.control.send_control_message(&text).await;
                return Ok(());
            }
        };
        let name = name.unwrap_or_else(|| args.raw.clone());

        let text = match self.identities.account_number(resolved.underlying, resolved.kind).await? {
            Some(account) => format!("{name}'s {phrase} is {account}"),
            None => format!("Failed to get the {phrase} of {name}"),
        };
        self.control.send_control_message(&text).await;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// -restart, -stop, -start
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Restart,
    Stop,
    Start,
}

impl SessionAction {
    fn status(&self) -> &'static str {
        match self {
            SessionAction::Restart => "Signing in again...",
            SessionAction::Stop => "Signing out of WebQQ",
            SessionAction::Start => "Signing in to WebQQ",
        }
    }
}

pub struct SessionHandler {
    pub session: Arc<dyn SessionController>,
    pub control: Arc<dyn ControlChannel>,
    pub action: SessionAction,
}

#[async_trait]
impl CommandHandler for SessionHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        info!(action = ?self.action, "[Commands] Session action requested");
        self.control.send_status(self.action.status()).await;
        match self.action {
            SessionAction::Restart => {
                self.session.disconnect().await?;
                self.session.connect().await?;
            }
            SessionAction::Stop => self.session.disconnect().await?,
            SessionAction::Start => self.session.connect().await?,
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// -gr id, -fr
// ---------------------------------------------------------------------------

pub struct RefreshGroupHandler {
    pub session: Arc<dyn SessionController>,
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for RefreshGroupHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, captures: &Captures) -> Result<()> {
        let args = TargetArgs::from_captures(captures)?;
        let Some(id) = args.numeric() else {
            self.control.send_control_message(&invalid_id(&args.raw)).await;
            return Ok(());
        };

        let outcome = self.session.refresh_group_info(id).await?;
        let text = if outcome.success {
            format!("[S] Refreshed member info of {}", outcome.info)
        } else {
            format!("[S] {}", outcome.info)
        };
        self.control.send_control_message(&text).await;
        Ok(())
    }
}

pub struct RefreshFriendsHandler {
    pub session: Arc<dyn SessionController>,
    pub control: Arc<dyn ControlChannel>,
}

#[async_trait]
impl CommandHandler for RefreshFriendsHandler {
    async fn handle(&self, _ctx: &CommandContext<'_>, _captures: &Captures) -> Result<()> {
        self.session.refresh_friend_info().await?;
        self.control.send_control_message("[S] Refreshed friend info").await;
        Ok(())
    }
}
