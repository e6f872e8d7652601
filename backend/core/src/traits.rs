use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{
    DiscussionRoster, FriendRoster, GroupRoster, IdKind, RefreshOutcome, ResolvedId,
};

/// Operator-facing side of the bridge (the XMPP control contact).
///
/// Delivery is fire-and-forget: implementations log their own failures.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    /// Send a control message to the operator.
    async fn send_control_message(&self, text: &str);

    /// Publish a presence status line to the operator.
    async fn send_status(&self, text: &str);
}

/// Friend, group and discussion rosters known to the QQ session.
#[async_trait]
pub trait RosterService: Send + Sync {
    async fn friends(&self) -> Result<FriendRoster>;

    /// `None` while the group list has not been fetched yet.
    async fn groups(&self) -> Result<Option<GroupRoster>>;

    /// `None` while the discussion list has not been fetched yet.
    async fn discussions(&self) -> Result<Option<DiscussionRoster>>;
}

/// Maps user-facing ids to the identifiers the QQ session works with.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, id: u64) -> Result<Option<ResolvedId>>;

    /// QQ number of a friend or group number of a group.
    async fn account_number(&self, underlying: u64, kind: IdKind) -> Result<Option<u64>>;
}

/// Lifecycle of the QQ session.
#[async_trait]
pub trait SessionController: Send + Sync {
    async fn connect(&self) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    async fn refresh_group_info(&self, id: u64) -> Result<RefreshOutcome>;

    async fn refresh_friend_info(&self) -> Result<()>;
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `content` to the friend, group or discussion behind `id`.
    async fn send_message_to(&self, id: u64, content: &str) -> Result<()>;
}

/// Capabilities injected into the command dispatcher at construction.
#[derive(Clone)]
pub struct Services {
    pub control: Arc<dyn ControlChannel>,
    pub roster: Arc<dyn RosterService>,
    pub identities: Arc<dyn IdentityResolver>,
    pub session: Arc<dyn SessionController>,
    pub sender: Arc<dyn MessageSender>,
}
