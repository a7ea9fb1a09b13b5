//! HTTP gateway to the botblock.org API.
//!
//! The gateway owns the HTTP client, the credential store and response
//! classification. It knows nothing about bot frameworks; the
//! [`client`](crate::client) module layers host-bot awareness on top of it.
//!
//! # Endpoints
//!
//! - `POST count` - submits the guild count to every list a credential is
//!   stored for
//! - `GET bots/{id}` - fetches aggregated information about a bot
//!
//! Both endpoints are resolved relative to [`GatewayConfig::base_url`].

pub mod credentials;
pub mod response;

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::{header::CONTENT_TYPE, Method};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::BotListError;

pub use credentials::CredentialStore;

/// Base URL of the public botblock.org API.
pub const API_BASE: &str = "https://botblock.org/api/";

const COUNT_ENDPOINT: &str = "count";

/// Connection settings for a [`Gateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL all endpoints are joined onto.
    pub base_url: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Create a config targeting `base_url` with default timeouts.
    ///
    /// - connect_timeout: 10 s
    /// - request_timeout: 30 s
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(API_BASE)
    }
}

/// Direct client for the botblock.org API.
///
/// The HTTP client is created once at construction and reused for every
/// request. Credentials sit behind a lock so a request body always sees a
/// consistent snapshot even when another task updates credentials meanwhile.
pub struct Gateway {
    base_url: Url,
    http: reqwest::Client,
    credentials: RwLock<CredentialStore>,
}

impl Gateway {
    /// Builds a gateway with its own HTTP client configured from `config`.
    ///
    /// # Returns
    /// - `Ok(Gateway)` - Ready to issue requests
    /// - `Err(BotListError::InvalidUrl)` - `config.base_url` is not a valid URL
    /// - `Err(BotListError::Transport)` - The HTTP client could not be built
    pub fn new(config: GatewayConfig) -> Result<Self, BotListError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;

        Self::with_client(http, &config.base_url)
    }

    /// Builds a gateway around an existing HTTP client.
    ///
    /// A trailing `/` is added to `base_url` when missing so that endpoint paths
    /// are appended rather than replacing the last path segment.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, BotListError> {
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };

        Ok(Self {
            base_url,
            http,
            credentials: RwLock::new(CredentialStore::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sets the authorization token for a botblock.org list ID.
    ///
    /// Replaces any token previously stored for the same list.
    pub fn set_credentials(&self, list_id: impl Into<String>, token: impl Into<String>) {
        let list_id = list_id.into();
        debug!(list_id = %list_id, "Setting bot list credentials");

        self.credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(list_id, token);
    }

    /// Removes the authorization token for a botblock.org list ID, if any.
    pub fn remove_credentials(&self, list_id: &str) {
        let removed = self
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(list_id);

        if removed.is_some() {
            debug!(list_id = %list_id, "Removed bot list credentials");
        }
    }

    /// Snapshot of the currently stored credentials.
    pub fn credentials(&self) -> CredentialStore {
        self.credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds the JSON body for a guild count submission.
    ///
    /// The body holds one `list_id: token` entry per stored credential plus
    /// `server_count` and the stringified `bot_id`.
    pub fn guild_count_body(&self, bot_id: u64, guild_count: usize) -> Value {
        let mut body: Map<String, Value> = self
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(list_id, token)| (list_id.to_string(), Value::String(token.to_string())))
            .collect();

        body.insert("server_count".to_string(), Value::from(guild_count));
        body.insert("bot_id".to_string(), Value::String(bot_id.to_string()));

        Value::Object(body)
    }

    /// Posts the guild count of `bot_id` to every list with stored credentials.
    ///
    /// # Returns
    /// - `Ok(Value)` - The API's JSON response on HTTP 200
    /// - `Err(BotListError)` - See [`response::classify`] for API-level errors;
    ///   `Transport` when the request itself failed
    pub async fn post_guild_count(
        &self,
        bot_id: u64,
        guild_count: usize,
    ) -> Result<Value, BotListError> {
        let body = self.guild_count_body(bot_id, guild_count);
        self.request(Method::POST, COUNT_ENDPOINT, Some(&body)).await
    }

    /// Fetches the information botblock.org aggregates about `bot_id`.
    pub async fn get_bot_info(&self, bot_id: u64) -> Result<Value, BotListError> {
        self.request(Method::GET, &format!("bots/{bot_id}"), None)
            .await
    }

    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, BotListError> {
        let url = self.base_url.join(endpoint)?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;

        debug!(%method, endpoint, status, "botblock.org API responded");

        let result = response::classify(status, &text);
        if let Err(BotListError::RateLimited { retry_after }) = &result {
            warn!(endpoint, retry_after = ?retry_after, "Rate limited by botblock.org");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn gateway() -> Gateway {
        Gateway::with_client(reqwest::Client::new(), API_BASE).unwrap()
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let gateway = Gateway::with_client(reqwest::Client::new(), "http://localhost:1234/api")
            .unwrap();
        assert_eq!(gateway.base_url().as_str(), "http://localhost:1234/api/");
        assert_eq!(
            gateway.base_url().join("bots/1").unwrap().as_str(),
            "http://localhost:1234/api/bots/1"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = Gateway::with_client(reqwest::Client::new(), "not a url");
        assert!(matches!(result, Err(BotListError::InvalidUrl(_))));
    }

    #[test]
    fn default_config_targets_botblock() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, API_BASE);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn body_without_credentials() {
        let body = gateway().guild_count_body(123, 42);
        assert_eq!(body, json!({"server_count": 42, "bot_id": "123"}));
    }

    #[test]
    fn body_contains_every_credential() {
        let gateway = gateway();
        gateway.set_credentials("top.gg", "token-a");
        gateway.set_credentials("discord.bots.gg", "token-b");

        let body = gateway.guild_count_body(987654321, 7);
        assert_eq!(
            body,
            json!({
                "top.gg": "token-a",
                "discord.bots.gg": "token-b",
                "server_count": 7,
                "bot_id": "987654321",
            })
        );
    }

    #[test]
    fn removed_credential_leaves_body() {
        let gateway = gateway();
        gateway.set_credentials("top.gg", "token-a");
        assert!(gateway.guild_count_body(1, 1).get("top.gg").is_some());

        gateway.remove_credentials("top.gg");
        assert!(gateway.guild_count_body(1, 1).get("top.gg").is_none());
    }

    #[test]
    fn removing_unknown_credential_is_noop() {
        let gateway = gateway();
        gateway.set_credentials("top.gg", "token-a");
        gateway.remove_credentials("missing");

        assert_eq!(gateway.credentials().len(), 1);
    }

    #[test]
    fn last_set_credentials_wins() {
        let gateway = gateway();
        gateway.set_credentials("top.gg", "old");
        gateway.set_credentials("top.gg", "new");

        assert_eq!(gateway.credentials().get("top.gg"), Some("new"));
        assert_eq!(gateway.guild_count_body(1, 1)["top.gg"], "new");
    }
}
