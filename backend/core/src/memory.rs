//! In-memory collaborators.
//!
//! Back the console host and the test suites: rosters come from a serde
//! snapshot, and every side effect is recorded so it can be inspected later.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::traits::{ControlChannel, IdentityResolver, MessageSender, RosterService, SessionController};
use crate::types::{
    Category, Discussion, DiscussionRoster, Friend, FriendRoster, Group, GroupRoster, IdKind,
    RefreshOutcome, ResolvedId,
};

// ---------------------------------------------------------------------------
// Control channel
// ---------------------------------------------------------------------------

/// One operator-facing report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Control(String),
    Status(String),
}

impl Report {
    pub fn text(&self) -> &str {
        match self {
            Report::Control(text) | Report::Status(text) => text,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingChannel {
    reports: Mutex<Vec<Report>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reports(&self) -> Vec<Report> {
        self.reports.lock().await.clone()
    }

    /// Drain everything recorded so far.
    pub async fn take(&self) -> Vec<Report> {
        std::mem::take(&mut *self.reports.lock().await)
    }
}

#[async_trait]
impl ControlChannel for RecordingChannel {
    async fn send_control_message(&self, text: &str) {
        self.reports.lock().await.push(Report::Control(text.to_string()));
    }

    async fn send_status(&self, text: &str) {
        self.reports.lock().await.push(Report::Status(text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub kind: IdKind,
    pub underlying: u64,
    pub account: u64,
}

/// Serialisable picture of everything the QQ session knows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub friends: Vec<Friend>,
    /// `None` models a group list that has not been fetched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussions: Option<Vec<Discussion>>,
    #[serde(default)]
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Default)]
pub struct InMemoryRoster {
    snapshot: RwLock<RosterSnapshot>,
}

impl InMemoryRoster {
    pub fn new(snapshot: RosterSnapshot) -> Self {
        Self { snapshot: RwLock::new(snapshot) }
    }

    pub async fn replace(&self, snapshot: RosterSnapshot) {
        *self.snapshot.write().await = snapshot;
    }

    /// Group by user-facing id.
    pub async fn group(&self, id: u64) -> Option<Group> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .groups
            .as_ref()
            .and_then(|groups| groups.iter().find(|g| g.id == id).cloned())
    }
}

#[async_trait]
impl RosterService for InMemoryRoster {
    async fn friends(&self) -> Result<FriendRoster> {
        let snapshot = self.snapshot.read().await;
        Ok(FriendRoster {
            categories: snapshot.categories.clone(),
            info: snapshot.friends.clone(),
        })
    }

    async fn groups(&self) -> Result<Option<GroupRoster>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .groups
            .as_ref()
            .map(|groups| GroupRoster { groups: groups.clone() }))
    }

    async fn discussions(&self) -> Result<Option<DiscussionRoster>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .discussions
            .as_ref()
            .map(|discus| DiscussionRoster { discus: discus.clone() }))
    }
}

#[async_trait]
impl IdentityResolver for InMemoryRoster {
    async fn resolve(&self, id: u64) -> Result<Option<ResolvedId>> {
        let snapshot = self.snapshot.read().await;

        if let Some(friend) = snapshot.friends.iter().find(|f| f.id == id) {
            return Ok(Some(ResolvedId { underlying: friend.uin, kind: IdKind::Friend }));
        }
        if let Some(group) = snapshot.groups.iter().flatten().find(|g| g.id == id) {
            return Ok(Some(ResolvedId { underlying: group.gid, kind: IdKind::Group }));
        }
        if let Some(discu) = snapshot.discussions.iter().flatten().find(|d| d.id == id) {
            return Ok(Some(ResolvedId { underlying: discu.did, kind: IdKind::Discussion }));
        }

        debug!(id, "Id did not resolve");
        Ok(None)
    }

    async fn account_number(&self, underlying: u64, kind: IdKind) -> Result<Option<u64>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .accounts
            .iter()
            .find(|a| a.kind == kind && a.underlying == underlying)
            .map(|a| a.account))
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected,
    Disconnected,
    GroupRefreshed(u64),
    FriendsRefreshed,
}

#[derive(Debug, Default)]
struct SessionState {
    connected: bool,
    events: Vec<SessionEvent>,
}

/// Session controller that only records what it was asked to do.
///
/// Group refreshes are answered from the roster it shares with the rest of
/// the in-memory collaborators.
#[derive(Debug)]
pub struct RecordingSession {
    roster: Arc<InMemoryRoster>,
    state: Mutex<SessionState>,
}

impl RecordingSession {
    pub fn new(roster: Arc<InMemoryRoster>) -> Self {
        Self { roster, state: Mutex::new(SessionState::default()) }
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    pub async fn events(&self) -> Vec<SessionEvent> {
        self.state.lock().await.events.clone()
    }
}

#[async_trait]
impl SessionController for RecordingSession {
    async fn connect(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.connected = true;
        state.events.push(SessionEvent::Connected);
        info!("Session connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.connected = false;
        state.events.push(SessionEvent::Disconnected);
        info!("Session disconnected");
        Ok(())
    }

    async fn refresh_group_info(&self, id: u64) -> Result<RefreshOutcome> {
        let outcome = match self.roster.group(id).await {
            Some(group) => {
                self.state.lock().await.events.push(SessionEvent::GroupRefreshed(id));
                RefreshOutcome::ok(group.name)
            }
            None => RefreshOutcome::failed(format!("No group with id {id}")),
        };
        info!(id, success = outcome.success, "Group refresh requested");
        Ok(outcome)
    }

    async fn refresh_friend_info(&self) -> Result<()> {
        self.state.lock().await.events.push(SessionEvent::FriendsRefreshed);
        info!("Friend refresh requested");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sender
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RecordingSender {
    roster: Arc<InMemoryRoster>,
    sent: Mutex<Vec<(u64, String)>>,
}

impl RecordingSender {
    pub fn new(roster: Arc<InMemoryRoster>) -> Self {
        Self { roster, sent: Mutex::new(Vec::new()) }
    }

    pub async fn sent(&self) -> Vec<(u64, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message_to(&self, id: u64, content: &str) -> Result<()> {
        if self.roster.resolve(id).await?.is_none() {
            return Err(BridgeError::UnknownTarget(id).into());
        }
        self.sent.lock().await.push((id, content.to_string()));
        debug!(id, len = content.len(), "Message recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Presence;

    fn snapshot() -> RosterSnapshot {
        RosterSnapshot {
            categories: vec![Category { index: 0, name: "Friends".into(), sort: 0 }],
            friends: vec![Friend {
                id: 1001,
                uin: 555,
                nick: "cold".into(),
                mark_name: None,
                category: 0,
                presence: Presence::Online,
            }],
            groups: Some(vec![Group { id: 2001, gid: 777, name: "rustaceans".into() }]),
            discussions: None,
            accounts: vec![AccountEntry { kind: IdKind::Friend, underlying: 555, account: 123456 }],
        }
    }

    #[tokio::test]
    async fn resolves_friends_before_groups() {
        let roster = InMemoryRoster::new(snapshot());
        let friend = roster.resolve(1001).await.unwrap().unwrap();
        assert_eq!(friend, ResolvedId { underlying: 555, kind: IdKind::Friend });
        let group = roster.resolve(2001).await.unwrap().unwrap();
        assert_eq!(group.kind, IdKind::Group);
        assert!(roster.resolve(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn account_lookup_is_kind_aware() {
        let roster = InMemoryRoster::new(snapshot());
        assert_eq!(roster.account_number(555, IdKind::Friend).await.unwrap(), Some(123456));
        assert_eq!(roster.account_number(555, IdKind::Group).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unfetched_discussions_are_absent() {
        let roster = InMemoryRoster::new(snapshot());
        assert!(roster.discussions().await.unwrap().is_none());
        assert_eq!(roster.groups().await.unwrap().unwrap().groups.len(), 1);
    }

    #[tokio::test]
    async fn sender_rejects_unknown_targets() {
        let roster = Arc::new(InMemoryRoster::new(snapshot()));
        let sender = RecordingSender::new(roster);
        assert!(sender.send_message_to(42, "hi").await.is_err());
        sender.send_message_to(1001, "hi").await.unwrap();
        assert_eq!(sender.sent().await, vec![(1001, "hi".to_string())]);
    }

    #[tokio::test]
    async fn session_tracks_connection_state() {
        let roster = Arc::new(InMemoryRoster::new(snapshot()));
        let session = RecordingSession::new(roster);
        session.connect().await.unwrap();
        assert!(session.is_connected().await);
        session.disconnect().await.unwrap();
        assert!(!session.is_connected().await);

        let outcome = session.refresh_group_info(2001).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::ok("rustaceans"));
        assert!(!session.refresh_group_info(5).await.unwrap().success);
    }
}
