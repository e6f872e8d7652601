mod console;
mod roster;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::info;

use magpie_commands::{build_default_dispatcher, CommandOptions};
use magpie_config::{
    config_dir, config_file_path, load_config, log_validation_warnings, referenced_env_vars,
    resolve_config, MagpieConfig, ValidationReport,
};
use magpie_core::{Presence, RecordingChannel, RosterSnapshot};
use magpie_logging::init_logger;

use console::{build_services, Console, StdoutChannel};
use roster::load_roster;
use terminal_output::{note_error, note_success, note_warn};

#[derive(Parser)]
#[command(name = "magpie")]
#[command(about = "magpie: operator console for the QQ bridge command interpreter")]
#[command(version)]
struct Cli {
    /// Config file (default: $MAGPIE_CONFIG_DIR/config.yaml or ~/.magpie/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read operator commands from stdin and dispatch them
    Console {
        /// YAML roster snapshot (overrides console.rosterPath)
        #[arg(long)]
        roster: Option<PathBuf>,
    },
    /// Print the command list
    Commands,
    /// Validate the config file
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    let result = match cli.command {
        Commands::Console { roster } => run_console(&config_path, roster).await,
        Commands::Commands => print_commands().await,
        Commands::Check => check_config(&config_path).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Map the validated `commands` section onto handler options.
fn command_options(config: &MagpieConfig) -> Result<CommandOptions> {
    let mut options = CommandOptions::default();
    let Some(commands) = &config.commands else {
        return Ok(options);
    };
    if let Some(presences) = &commands.online_presences {
        options.online_presences = presences
            .iter()
            .map(|p| p.parse::<Presence>())
            .collect::<Result<_, _>>()
            .context("Invalid commands.onlinePresences")?;
    }
    if let Some(confirm) = commands.confirm_sends {
        options.confirm_sends = confirm;
    }
    Ok(options)
}

async fn run_console(config_path: &Path, roster_override: Option<PathBuf>) -> Result<()> {
    let (config, report) = resolve_config(load_config(config_path).await?)?;

    // Config warnings are only visible once the subscriber is installed.
    let logging = config.logging.clone().unwrap_or_default();
    let _guard = init_logger(
        logging.dir.as_deref().unwrap_or("logs"),
        logging.level.as_deref().unwrap_or("info"),
    );
    info!(path = %config_path.display(), "Loaded config");
    log_validation_warnings(&report);

    let console_config = config.console.clone().unwrap_or_default();
    let roster_path = roster_override.or_else(|| console_config.roster_path.map(PathBuf::from));
    let snapshot = load_roster(roster_path.as_deref()).await?;

    let services = build_services(snapshot, Arc::new(StdoutChannel::new()));
    let dispatcher = build_default_dispatcher(&services, &command_options(&config)?)?;
    info!(commands = dispatcher.registry().len(), "Command table ready");

    note_success("magpie console ready; type -help for commands, -quit to leave");
    let session_name = console_config.session_name.unwrap_or_else(|| "console".to_string());
    Console::new(dispatcher, session_name)
        .run(BufReader::new(tokio::io::stdin()))
        .await
}

async fn print_commands() -> Result<()> {
    let services = build_services(RosterSnapshot::default(), Arc::new(RecordingChannel::new()));
    let dispatcher = build_default_dispatcher(&services, &CommandOptions::default())?;
    println!("{}", dispatcher.help());
    Ok(())
}

async fn check_config(config_path: &Path) -> Result<()> {
    let raw = load_config(config_path).await?;
    let env_vars = referenced_env_vars(&raw)?;
    let (config, report) = resolve_config(raw)?;
    command_options(&config)?;

    for line in check_notes(&env_vars, &report) {
        note_warn(&line);
    }
    if config.console.as_ref().and_then(|c| c.roster_path.as_ref()).is_none() {
        note_warn("No console.rosterPath configured; the console starts with an empty roster");
    }
    note_success(&format!("{} is valid", config_path.display()));
    print!("{}", serde_yaml::to_string(&config).context("Failed to render config")?);
    Ok(())
}

/// Warnings and env references worth showing after a successful check.
fn check_notes(env_vars: &[String], report: &ValidationReport) -> Vec<String> {
    let mut notes: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
    if !env_vars.is_empty() {
        notes.push(format!("Config reads env vars: {}", env_vars.join(", ")));
    }
    notes
}
