//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_cannon::{Direction, NUM_COLUMNS, NUM_ROWS, RuleSet};
use tracing::{debug, info, instrument};

/// Environment variable overriding the primary bot URL.
pub const PRIMARY_BOT_URL_ENV: &str = "CANNON_PRIMARY_BOT_URL";
/// Environment variable overriding the secondary bot URL.
pub const SECONDARY_BOT_URL_ENV: &str = "CANNON_SECONDARY_BOT_URL";

/// Rule variant toggles.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct RulesConfig {
    /// Whether formations may lie on diagonals.
    #[serde(default = "default_diagonal_formations")]
    diagonal_formations: bool,

    /// Distances beyond the front a strike can reach.
    #[serde(default = "default_capture_offsets")]
    capture_offsets: Vec<u8>,

    /// A side with this many townhalls or fewer has lost.
    #[serde(default = "default_min_townhalls")]
    min_townhalls: usize,
}

fn default_diagonal_formations() -> bool {
    true
}

fn default_capture_offsets() -> Vec<u8> {
    vec![2]
}

fn default_min_townhalls() -> usize {
    2
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            diagonal_formations: default_diagonal_formations(),
            capture_offsets: default_capture_offsets(),
            min_townhalls: default_min_townhalls(),
        }
    }
}

impl RulesConfig {
    /// Builds the rule set these toggles describe.
    pub fn to_rule_set(&self) -> RuleSet {
        let mut directions = Direction::ORTHOGONAL.to_vec();
        if self.diagonal_formations {
            directions.extend_from_slice(&Direction::DIAGONAL);
        }
        RuleSet {
            directions,
            capture_offsets: self.capture_offsets.clone(),
            min_townhalls: self.min_townhalls,
        }
    }
}

/// Timing, bot endpoints and rules for a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GameConfig {
    /// Delay before a staged move shows its guide, in milliseconds.
    #[serde(default = "default_delay_ms")]
    guide_delay_ms: u64,

    /// Further delay before the staged move is applied, in milliseconds.
    #[serde(default = "default_delay_ms")]
    commit_delay_ms: u64,

    /// How long to wait for a bot's answer, in seconds.
    #[serde(default = "default_bot_timeout_secs")]
    bot_timeout_secs: u64,

    /// Remote primary bot. A local bot plays when absent.
    #[serde(default)]
    #[setters(strip_option)]
    primary_bot_url: Option<String>,

    /// Remote secondary bot. A local bot plays when absent.
    #[serde(default)]
    #[setters(strip_option)]
    secondary_bot_url: Option<String>,

    /// Rule variant.
    #[serde(default)]
    rules: RulesConfig,
}

fn default_delay_ms() -> u64 {
    500
}

fn default_bot_timeout_secs() -> u64 {
    30
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            guide_delay_ms: default_delay_ms(),
            commit_delay_ms: default_delay_ms(),
            bot_timeout_secs: default_bot_timeout_secs(),
            primary_bot_url: None,
            secondary_bot_url: None,
            rules: RulesConfig::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(rules = ?config.rules, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies bot URL overrides from the environment.
    #[instrument(skip(self))]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(PRIMARY_BOT_URL_ENV) {
            debug!(url = %url, "Primary bot URL from environment");
            self.primary_bot_url = Some(url);
        }
        if let Ok(url) = std::env::var(SECONDARY_BOT_URL_ENV) {
            debug!(url = %url, "Secondary bot URL from environment");
            self.secondary_bot_url = Some(url);
        }
        self
    }

    /// Rejects rule tables no game can be played under.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.capture_offsets.is_empty() {
            return Err(ConfigError::new(
                "rules.capture_offsets must not be empty".to_string(),
            ));
        }
        let max = NUM_ROWS.max(NUM_COLUMNS) - 1;
        if let Some(offset) = self
            .rules
            .capture_offsets
            .iter()
            .find(|&&offset| !(1..=max).contains(&offset))
        {
            return Err(ConfigError::new(format!(
                "rules.capture_offsets entries must be in 1..={}, got {}",
                max, offset
            )));
        }
        if self.bot_timeout_secs == 0 {
            return Err(ConfigError::new(
                "bot_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Phase-one animation delay.
    pub fn guide_delay(&self) -> Duration {
        Duration::from_millis(self.guide_delay_ms)
    }

    /// Phase-two animation delay.
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Bot answer timeout.
    pub fn bot_timeout(&self) -> Duration {
        Duration::from_secs(self.bot_timeout_secs)
    }

    /// Rule set described by `rules`.
    pub fn rule_set(&self) -> RuleSet {
        self.rules.to_rule_set()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
