//! Strictly Cannon - terminal front end
//!
//! Plays Cannon against humans or bots, or replays a recorded log.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strictly_cannon_app::cli::{Cli, Command as CliCommand};
use strictly_cannon_app::{
    BotClient, Command, GameConfig, GameDriver, GameEvent, GameMode, GameSession, HttpBotClient,
    LocalBot, console,
};
use tokio::sync::mpsc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Play { mode, side, config } => {
            run_play(mode.with_side(side), config.as_deref()).await
        }
        CliCommand::Replay { log, config } => run_replay(log, config.as_deref()).await,
    }
}

/// Loads the config file, or defaults, and applies environment overrides.
#[instrument]
fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let config = match path {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Builds the bot for one seat: remote when a URL is configured, local otherwise.
fn make_bot(name: &str, url: Option<&String>, config: &GameConfig) -> Arc<dyn BotClient> {
    match url {
        Some(url) => Arc::new(HttpBotClient::new(name, url)),
        None => Arc::new(LocalBot::new(name, config.rule_set())),
    }
}

/// Runs an interactive game.
#[instrument(skip(config_path))]
async fn run_play(mode: GameMode, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    info!(mode = %mode, "Starting game");

    let session = GameSession::new(config.rule_set(), mode);
    let (commands, events, driver) = start_driver(session, &config);
    commands
        .send(Command::Start(mode))
        .context("Driver stopped before the game started")?;

    console::run(commands, events, false).await;
    driver.await.context("Driver task failed")?;
    Ok(())
}

/// Replays a log file with the normal animation.
#[instrument(skip(config_path), fields(log = %log.display()))]
async fn run_replay(log: PathBuf, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let text = std::fs::read_to_string(&log)
        .with_context(|| format!("Failed to read log file {}", log.display()))?;
    let records = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let mut session = GameSession::new(config.rule_set(), GameMode::default());
    session.load_log(records)?;
    info!(records = session.log().len(), "Log loaded");

    let (commands, events, driver) = start_driver(session, &config);
    commands
        .send(Command::Replay)
        .context("Driver stopped before the replay started")?;

    console::run(commands, events, true).await;
    driver.await.context("Driver task failed")?;
    Ok(())
}

/// Wires a session to its bots and spawns the driver.
fn start_driver(
    session: GameSession,
    config: &GameConfig,
) -> (
    mpsc::UnboundedSender<Command>,
    mpsc::UnboundedReceiver<GameEvent>,
    tokio::task::JoinHandle<GameSession>,
) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let primary = make_bot("primary", config.primary_bot_url().as_ref(), config);
    let secondary = make_bot("secondary", config.secondary_bot_url().as_ref(), config);
    let driver = GameDriver::new(session, config, primary, secondary, event_tx);
    let (commands, handle) = driver.spawn();
    (commands, event_rx, handle)
}
