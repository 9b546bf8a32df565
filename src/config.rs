//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line overrides.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable holding the agent base URL.
pub const AGENT_API_VAR: &str = "AGENT_API";
/// Environment variable holding the play-data base URL.
pub const PLAYDATA_API_VAR: &str = "PLAYDATA_API";
/// Environment variable that suppresses play-data submission.
pub const DISABLE_PLAYDATA_VAR: &str = "DISABLE_PLAYDATA";
/// Environment variable holding the remote call timeout in milliseconds.
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT_MS";
/// Environment variable holding the post-game reset delay in milliseconds.
pub const RESET_DELAY_VAR: &str = "RESET_DELAY_MS";

/// Game client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct GameConfig {
    /// Base URL of the agent service (`POST {agent_api}/action`).
    agent_api: String,

    /// Base URL of the play-data service (`POST {playdata_api}/submit`).
    playdata_api: String,

    /// Skip play-data submission entirely.
    disable_playdata: bool,

    /// Timeout for each remote call.
    request_timeout_ms: u64,

    /// Pause on the finished board before a new game starts.
    reset_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            agent_api: "http://localhost:5000".to_string(),
            playdata_api: "http://localhost:5001".to_string(),
            disable_playdata: false,
            request_timeout_ms: 5000,
            reset_delay_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Loads defaults, then `path` if given, then the process environment.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_vars(|name| std::env::var(name).ok())?;
        info!(
            agent_api = %config.agent_api,
            playdata_api = %config.playdata_api,
            disable_playdata = config.disable_playdata,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        toml::from_str::<Self>(&content)
            .map(Self::normalized)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Overrides fields from variables found by `lookup`.
    #[instrument(skip(self, lookup))]
    pub fn with_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(AGENT_API_VAR) {
            self.agent_api = url;
        }
        if let Some(url) = lookup(PLAYDATA_API_VAR) {
            self.playdata_api = url;
        }
        if let Some(value) = lookup(DISABLE_PLAYDATA_VAR) {
            self.disable_playdata = parse_bool(DISABLE_PLAYDATA_VAR, &value)?;
        }
        if let Some(value) = lookup(REQUEST_TIMEOUT_VAR) {
            self.request_timeout_ms = parse_millis(REQUEST_TIMEOUT_VAR, &value)?;
        }
        if let Some(value) = lookup(RESET_DELAY_VAR) {
            self.reset_delay_ms = parse_millis(RESET_DELAY_VAR, &value)?;
        }
        Ok(self.normalized())
    }

    /// Timeout for each remote call.
    #[instrument(skip(self))]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Delay between a finished game and the reset.
    #[instrument(skip(self))]
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    fn normalized(mut self) -> Self {
        self.agent_api = self.agent_api.trim_end_matches('/').to_string();
        self.playdata_api = self.playdata_api.trim_end_matches('/').to_string();
        self
    }
}

#[track_caller]
fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::new(format!(
            "{} must be a boolean, got {:?}",
            name, other
        ))),
    }
}

#[track_caller]
fn parse_millis(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::new(format!(
            "{} must be a whole number of milliseconds, got {:?}",
            name, value
        ))
    })
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
