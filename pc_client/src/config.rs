//! Client configuration management.
//!
//! Consolidates environment variable reads and command line overrides into
//! a validated configuration.

use pokerchips::{
    DEFAULT_MAX_BET, GameSetup, MAX_PLAYERS, MIN_PLAYERS, SetupError, SetupForm,
    entities::Chips,
};
use std::path::PathBuf;

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_bet: Option<Chips>,
    pub player_count: Option<usize>,
    pub names: Vec<String>,
    pub quick_start: bool,
    pub log_file: Option<PathBuf>,
}

/// Complete client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Max bet the setup form starts at
    pub max_bet: Chips,
    /// Player count the setup form starts at
    pub player_count: usize,
    /// Names prefilled in seat order
    pub names: Vec<String>,
    /// Skip the setup screen
    pub quick_start: bool,
    /// Where log records go; logging is off without one
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_bet: DEFAULT_MAX_BET,
            player_count: MIN_PLAYERS,
            names: Vec::new(),
            quick_start: false,
            log_file: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, then apply the
    /// command line overrides.
    ///
    /// Unparseable environment values fall back to their defaults; call
    /// [`ClientConfig::validate`] before using the result.
    #[must_use]
    pub fn from_env(overrides: ConfigOverrides) -> Self {
        let max_bet = overrides
            .max_bet
            .unwrap_or_else(|| parse_env_or("POKERCHIPS_MAX_BET", DEFAULT_MAX_BET));

        let names = if overrides.names.is_empty() {
            std::env::var("POKERCHIPS_NAMES")
                .map(|v| v.split(',').map(|name| name.trim().to_string()).collect())
                .unwrap_or_default()
        } else {
            overrides.names
        };

        // Enough seats for every given name unless a count was asked for.
        let player_count = overrides.player_count.unwrap_or_else(|| {
            parse_env_or("POKERCHIPS_PLAYERS", names.len().max(MIN_PLAYERS))
        });

        let log_file = overrides
            .log_file
            .or_else(|| std::env::var_os("POKERCHIPS_LOG_FILE").map(PathBuf::from));

        ClientConfig {
            max_bet,
            player_count,
            names,
            quick_start: overrides.quick_start,
            log_file,
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.setup_form().map(|_| ())
    }

    /// Setup form prefilled from this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is one the setup screen can't show.
    pub fn setup_form(&self) -> Result<SetupForm, ConfigError> {
        let mut form = SetupForm::new();
        form.set_player_count(self.player_count)
            .map_err(|e| ConfigError::invalid("POKERCHIPS_PLAYERS", &e))?;
        form.set_max_bet(self.max_bet)
            .map_err(|e| ConfigError::invalid("POKERCHIPS_MAX_BET", &e))?;

        if self.names.len() > self.player_count {
            return Err(ConfigError::Invalid {
                var: "POKERCHIPS_NAMES".to_string(),
                reason: format!(
                    "{} names given for {} players",
                    self.names.len(),
                    self.player_count
                ),
            });
        }
        for (seat, name) in self.names.iter().enumerate() {
            form.set_name(seat, name)
                .map_err(|e| ConfigError::invalid("POKERCHIPS_NAMES", &e))?;
        }
        Ok(form)
    }

    /// Setup payload for starting straight at the betting screen.
    pub fn quick_start_setup(&self) -> Result<Option<GameSetup>, ConfigError> {
        if !self.quick_start {
            return Ok(None);
        }
        Ok(Some(self.setup_form()?.build()))
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &str, source: &SetupError) -> Self {
        Self::Invalid {
            var: var.to_string(),
            reason: match source {
                SetupError::InvalidPlayerCount { .. } => {
                    format!("{source} (allowed: {MIN_PLAYERS}-{MAX_PLAYERS})")
                }
                _ => source.to_string(),
            },
        }
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
