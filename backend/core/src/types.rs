use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Presence of a friend as reported by the QQ side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    Busy,
    Hidden,
    #[default]
    Offline,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Online => "online",
            Presence::Away => "away",
            Presence::Busy => "busy",
            Presence::Hidden => "hidden",
            Presence::Offline => "offline",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presence {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(Presence::Online),
            "away" => Ok(Presence::Away),
            "busy" => Ok(Presence::Busy),
            "hidden" => Ok(Presence::Hidden),
            "offline" => Ok(Presence::Offline),
            _ => Err(BridgeError::UnknownPresence(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

/// A friend category ("分组" on the QQ side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub index: u32,
    pub name: String,
    #[serde(default)]
    pub sort: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    /// User-facing unique id, the one operators type.
    pub id: u64,
    /// Underlying identifier used by the QQ session.
    pub uin: u64,
    pub nick: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark_name: Option<String>,
    #[serde(default)]
    pub category: u32,
    #[serde(default)]
    pub presence: Presence,
}

impl Friend {
    /// Mark-name when set, nick otherwise.
    pub fn show_name(&self) -> &str {
        self.mark_name.as_deref().unwrap_or(&self.nick)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRoster {
    pub categories: Vec<Category>,
    pub info: Vec<Friend>,
}

impl FriendRoster {
    pub fn show_name(&self, uin: u64) -> Option<&str> {
        self.info.iter().find(|f| f.uin == uin).map(Friend::show_name)
    }
}

// ---------------------------------------------------------------------------
// Groups and discussions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub gid: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRoster {
    pub groups: Vec<Group>,
}

impl GroupRoster {
    pub fn group_name(&self, gid: u64) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.gid == gid)
            .map(|g| g.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    pub id: u64,
    pub did: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionRoster {
    pub discus: Vec<Discussion>,
}

// ---------------------------------------------------------------------------
// Identifier resolution
// ---------------------------------------------------------------------------

/// What a user-facing id turned out to point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    Friend,
    Group,
    Discussion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedId {
    pub underlying: u64,
    pub kind: IdKind,
}

/// Result of a manual group member refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub success: bool,
    /// Group name on success, failure reason otherwise.
    pub info: String,
}

impl RefreshOutcome {
    pub fn ok(info: impl Into<String>) -> Self {
        Self { success: true, info: info.into() }
    }

    pub fn failed(info: impl Into<String>) -> Self {
        Self { success: false, info: info.into() }
    }
}
