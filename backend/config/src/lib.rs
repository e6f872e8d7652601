//! `magpie-config`: bridge configuration management.
//!
//! Provides:
//! - Typed config schema (logging, built-in commands, console host)
//! - YAML loading from `MAGPIE_CONFIG_DIR` or `~/.magpie/`
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation with error/warning reports

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config, CONFIG_DIR_ENV};
pub use schema::{CommandsConfig, ConsoleConfig, LoggingConfig, MagpieConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, apply env substitution and defaults, then validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// errors fail the load; warnings are logged.
pub async fn load_and_prepare(path: &Path) -> Result<MagpieConfig> {
    let raw_config = load_config(path).await?;
    prepare(raw_config)
}

/// Everything `load_and_prepare` does after reading the file.
pub fn prepare(raw_config: MagpieConfig) -> Result<MagpieConfig> {
    let (config, report) = resolve_config(raw_config)?;
    log_validation_warnings(&report);
    Ok(config)
}

/// Env substitution, defaults and validation without logging.
///
/// Errors fail the call; warnings come back in the report so the caller can
/// log them once its subscriber is installed.
pub fn resolve_config(raw_config: MagpieConfig) -> Result<(MagpieConfig, ValidationReport)> {
    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: MagpieConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let errors: Vec<_> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid config:\n{}", errors.join("\n"));
    }

    Ok((config, report))
}

pub fn log_validation_warnings(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
}

/// Env vars referenced by `config`, sorted and deduplicated.
pub fn referenced_env_vars(config: &MagpieConfig) -> Result<Vec<String>> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(collect_referenced_vars(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_applies_defaults() {
        let config = prepare(MagpieConfig::default()).unwrap();
        assert_eq!(config.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn prepare_rejects_invalid_presences() {
        let raw = parse_config("commands:\n  onlinePresences: [online, napping]\n").unwrap();
        let err = prepare(raw).unwrap_err().to_string();
        assert!(err.contains("commands.onlinePresences[1]"));
    }

    #[test]
    fn resolve_returns_warnings_instead_of_logging_them() {
        let raw = parse_config("commands:\n  onlinePresences: []\n").unwrap();
        let (config, report) = resolve_config(raw).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "commands.onlinePresences");
        assert_eq!(config.logging.unwrap().dir.as_deref(), Some("logs"));
    }

    #[tokio::test]
    async fn load_and_prepare_reads_file_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        std::fs::write(&path, "commands:\n  confirmSends: false\n").unwrap();

        let config = load_and_prepare(&path).await.unwrap();
        let commands = config.commands.unwrap();
        assert_eq!(commands.confirm_sends, Some(false));
        assert_eq!(commands.online_presences.unwrap(), ["online", "away"]);
    }

    #[test]
    fn referenced_vars_come_from_the_raw_config() {
        let raw = parse_config("console:\n  rosterPath: ${MAGPIE_ROSTER}\n  sessionName: $${LITERAL}\n").unwrap();
        assert_eq!(referenced_env_vars(&raw).unwrap(), ["MAGPIE_ROSTER"]);
    }
}
