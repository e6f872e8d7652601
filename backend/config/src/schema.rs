//! Bridge configuration schema, typed for serde YAML/JSON deserialization.
//!
//! Every field is optional on disk; `defaults` fills the gaps after load.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagpieConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Built-in command behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands: Option<CommandsConfig>,

    /// Console host settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory of the rolling log file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandsConfig {
    /// Presences listed by `-list` ("online", "away", "busy", "hidden", "offline").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online_presences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_sends: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleConfig {
    /// YAML roster snapshot loaded at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roster_path: Option<String>,
    /// Session label attached to command events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_name: Option<String>,
}
