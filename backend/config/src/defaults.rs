//! Config defaults: applies default values to parsed config.

use crate::schema::{CommandsConfig, ConsoleConfig, LoggingConfig, MagpieConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_LOG_DIR: &str = "logs";

pub const DEFAULT_ONLINE_PRESENCES: [&str; 2] = ["online", "away"];

pub const DEFAULT_SESSION_NAME: &str = "console";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: MagpieConfig) -> MagpieConfig {
    let config = apply_logging_defaults(config);
    let config = apply_command_defaults(config);
    apply_console_defaults(config)
}

fn apply_logging_defaults(mut config: MagpieConfig) -> MagpieConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.dir.get_or_insert_with(|| DEFAULT_LOG_DIR.to_string());
    config
}

fn apply_command_defaults(mut config: MagpieConfig) -> MagpieConfig {
    let commands = config.commands.get_or_insert_with(CommandsConfig::default);
    commands
        .online_presences
        .get_or_insert_with(|| DEFAULT_ONLINE_PRESENCES.map(str::to_string).to_vec());
    commands.confirm_sends.get_or_insert(true);
    config
}

/// The roster path has no default: without one the console starts empty.
fn apply_console_defaults(mut config: MagpieConfig) -> MagpieConfig {
    let console = config.console.get_or_insert_with(ConsoleConfig::default);
    console.session_name.get_or_insert_with(|| DEFAULT_SESSION_NAME.to_string());
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let config = apply_all_defaults(MagpieConfig::default());
        let logging = config.logging.unwrap();
        assert_eq!(logging.level.as_deref(), Some("info"));
        assert_eq!(logging.dir.as_deref(), Some("logs"));
        let commands = config.commands.unwrap();
        assert_eq!(commands.online_presences.unwrap(), ["online", "away"]);
        assert_eq!(commands.confirm_sends, Some(true));
        let console = config.console.unwrap();
        assert_eq!(console.session_name.as_deref(), Some("console"));
        assert!(console.roster_path.is_none());
    }

    #[test]
    fn keeps_explicit_values() {
        let config = MagpieConfig {
            commands: Some(CommandsConfig {
                online_presences: Some(vec![]),
                confirm_sends: Some(false),
            }),
            ..Default::default()
        };
        let commands = apply_all_defaults(config).commands.unwrap();
        assert_eq!(commands.online_presences, Some(vec![]));
        assert_eq!(commands.confirm_sends, Some(false));
    }
}
