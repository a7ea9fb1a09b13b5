//! Error types for botblock.org API interactions.
//!
//! `BotListError` is the single error type returned by the gateway and the bot
//! adapter. The first four variants are the API-level outcomes produced by
//! response classification and bot lookups; the remaining variants cover
//! transport and setup failures that happen before a response is available.
//!
//! Callers distinguish retryable failures with [`BotListError::is_rate_limited`]
//! and [`BotListError::retry_after`].

pub mod config;

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all bot list operations.
#[derive(Error, Debug)]
pub enum BotListError {
    /// The API answered with a non-200, non-429 status and a non-empty body.
    ///
    /// # Fields
    /// - `status` - HTTP status code returned by the API
    /// - `text` - Raw response body, unparsed
    #[error("{status}: {text}")]
    RequestFailed { status: u16, text: String },

    /// The API answered with HTTP 429.
    ///
    /// `retry_after` is taken from the `retry_after` field of the JSON body when
    /// the API supplied one.
    #[error(
        "The request to the API endpoint was ratelimited.{}",
        retry_after_hint(.retry_after)
    )]
    RateLimited { retry_after: Option<f64> },

    /// The API sent back nothing at all: no JSON and a blank body.
    ///
    /// Takes precedence over status code checks.
    #[error("No response was received from the API.")]
    EmptyResponse,

    /// A bot could be resolved neither through the host framework nor through
    /// the API.
    #[error("The requested entity was not found.")]
    NotFound,

    /// The HTTP request could not be completed (connection, TLS, timeout).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The configured base URL or an endpoint path could not be parsed.
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),

    /// The host bot exposes none of the accessors for a required capability.
    #[error("Host bot does not expose {0}")]
    MissingCapability(&'static str),

    /// A posting loop started from the same client is still running.
    #[error("Guild count loop is already running")]
    LoopAlreadyRunning,
}

impl BotListError {
    /// Whether this error is a rate limit response that can be retried later.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Delay the API asked for before retrying, if this is a rate limit with a
    /// usable `retry_after` value.
    ///
    /// Negative, NaN and values too large for a [`Duration`] yield `None`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited {
                retry_after: Some(secs),
            } => Duration::try_from_secs_f64(*secs).ok(),
            _ => None,
        }
    }
}

fn retry_after_hint(retry_after: &Option<f64>) -> String {
    match retry_after {
        Some(secs) => format!("\nPlease re-attempt this request after {secs} seconds."),
        None => String::new(),
    }
}
