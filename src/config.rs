use std::time::Duration;

use crate::{
    client::DEFAULT_INTERVAL,
    error::config::ConfigError,
    gateway::{GatewayConfig, API_BASE},
};

const API_BASE_VAR: &str = "BOTBLOCK_API_BASE";
const POST_INTERVAL_VAR: &str = "BOTBLOCK_POST_INTERVAL";
const CREDENTIALS_VAR: &str = "BOTBLOCK_CREDENTIALS";
const DISCORD_TOKEN_VAR: &str = "DISCORD_BOT_TOKEN";

/// Settings for posting guild counts, read from the environment.
///
/// | Variable                 | Default                      |
/// |--------------------------|------------------------------|
/// | `BOTBLOCK_API_BASE`      | `https://botblock.org/api/`  |
/// | `BOTBLOCK_POST_INTERVAL` | `1800` (seconds)             |
/// | `BOTBLOCK_CREDENTIALS`   | none (`list=token,list=token`) |
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub post_interval: Duration,
    pub credentials: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the Discord bot token the bundled binary logs in with.
    pub fn discord_token_from_env() -> Result<String, ConfigError> {
        std::env::var(DISCORD_TOKEN_VAR)
            .map_err(|_| ConfigError::MissingEnvVar(DISCORD_TOKEN_VAR.to_string()))
    }

    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.api_base.clone())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup(API_BASE_VAR).unwrap_or_else(|| API_BASE.to_string());

        let post_interval = match lookup(POST_INTERVAL_VAR) {
            Some(value) => parse_interval(&value)?,
            None => DEFAULT_INTERVAL,
        };

        let credentials = match lookup(CREDENTIALS_VAR) {
            Some(value) => parse_credentials(&value)?,
            None => Vec::new(),
        };

        Ok(Self {
            api_base,
            post_interval,
            credentials,
        })
    }
}

fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEnvVar {
        name: POST_INTERVAL_VAR.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(&e.to_string()))?;

    if secs == 0 {
        return Err(invalid("interval must be at least one second"));
    }

    Ok(Duration::from_secs(secs))
}

fn parse_credentials(value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((list_id, token)) if !list_id.trim().is_empty() => {
                Ok((list_id.trim().to_string(), token.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidEnvVar {
                name: CREDENTIALS_VAR.to_string(),
                value: pair.to_string(),
                reason: "expected list_id=token".to_string(),
            }),
        })
        .collect()
}
