//! Roster snapshot loading for the console host.

use std::path::Path;

use anyhow::{Context, Result};
use magpie_core::RosterSnapshot;
use tokio::fs;
use tracing::info;

pub fn parse_roster(raw: &str) -> Result<RosterSnapshot> {
    if raw.trim().is_empty() {
        return Ok(RosterSnapshot::default());
    }
    serde_yaml::from_str(raw).context("Failed to parse roster YAML")
}

/// Load a YAML roster snapshot; no path means an empty roster.
pub async fn load_roster(path: Option<&Path>) -> Result<RosterSnapshot> {
    let Some(path) = path else {
        info!("No roster configured; starting with an empty roster");
        return Ok(RosterSnapshot::default());
    };

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let snapshot = parse_roster(&raw).with_context(|| format!("Invalid roster at: {}", path.display()))?;

    info!(
        path = %path.display(),
        friends = snapshot.friends.len(),
        groups = snapshot.groups.as_ref().map_or(0, Vec::len),
        "Loaded roster"
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use magpie_core::{IdKind, Presence};

    use super::*;

    const ROSTER: &str = r#"
categories:
  - { index: 0, name: Friends, sort: 1 }
friends:
  - { id: 1001, uin: 501, nick: cold, markName: Boss, category: 0, presence: online }
  - { id: 1002, uin: 502, nick: alice }
groups:
  - { id: 2001, gid: 701, name: rustaceans }
accounts:
  - { kind: friend, underlying: 501, account: 10001 }
"#;

    #[test]
    fn parses_snapshot_with_defaults() {
        let snapshot = parse_roster(ROSTER).unwrap();
        assert_eq!(snapshot.friends[0].mark_name.as_deref(), Some("Boss"));
        assert_eq!(snapshot.friends[1].presence, Presence::Offline);
        assert_eq!(snapshot.groups.unwrap().len(), 1);
        assert!(snapshot.discussions.is_none());
        assert_eq!(snapshot.accounts[0].kind, IdKind::Friend);
    }

    #[tokio::test]
    async fn no_path_is_an_empty_roster() {
        let snapshot = load_roster(None).await.unwrap();
        assert!(snapshot.friends.is_empty());
        assert!(snapshot.groups.is_none());
    }
}
