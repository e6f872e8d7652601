//! Config validation with user-friendly error messages.

use crate::schema::MagpieConfig;
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const PRESENCES: [&str; 5] = ["online", "away", "busy", "hidden", "offline"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &MagpieConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_commands(config, &mut report);
    validate_console(config, &mut report);
    report
}

fn validate_logging(config: &MagpieConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            report.error(
                "logging.level",
                format!("Unknown level '{level}'; expected one of {}", LOG_LEVELS.join(", ")),
            );
        }
    }
    if logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        report.error("logging.dir", "Log directory must not be empty");
    }
}

fn validate_commands(config: &MagpieConfig, report: &mut ValidationReport) {
    let Some(commands) = &config.commands else { return };
    let Some(presences) = &commands.online_presences else { return };

    if presences.is_empty() {
        report.warn("commands.onlinePresences", "Empty list; -list will never show a friend");
    }
    for (i, presence) in presences.iter().enumerate() {
        if !PRESENCES.contains(&presence.trim().to_lowercase().as_str()) {
            report.error(
                format!("commands.onlinePresences[{i}]"),
                format!("Unknown presence '{presence}'; expected one of {}", PRESENCES.join(", ")),
            );
        }
    }
}

fn validate_console(config: &MagpieConfig, report: &mut ValidationReport) {
    let Some(console) = &config.console else { return };
    if console.roster_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        report.error("console.rosterPath", "Roster path must not be empty");
    }
    if console.session_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        report.warn("console.sessionName", "Empty session name; command events will be hard to tell apart");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::{CommandsConfig, LoggingConfig};

    #[test]
    fn defaults_are_valid() {
        let report = validate(&apply_all_defaults(MagpieConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_unknown_level_and_presence() {
        let config = MagpieConfig {
            logging: Some(LoggingConfig { level: Some("loud".into()), dir: None }),
            commands: Some(CommandsConfig {
                online_presences: Some(vec!["online".into(), "sleeping".into()]),
                confirm_sends: None,
            }),
            console: None,
        };
        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["logging.level", "commands.onlinePresences[1]"]);
    }

    #[test]
    fn empty_presence_list_is_a_warning() {
        let config = MagpieConfig {
            commands: Some(CommandsConfig { online_presences: Some(vec![]), confirm_sends: None }),
            ..Default::default()
        };
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }
}
