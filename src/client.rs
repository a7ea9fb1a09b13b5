//! Bot adapter tying a host bot to the botblock.org gateway.
//!
//! [`BotListClient`] reads the guild count and identity of a [`HostBot`],
//! forwards credential management to its [`Gateway`] and can post the guild
//! count periodically from a background task.
//!
//! # Background loop
//!
//! The loop started by [`BotListClient::start_loop`] moves through
//! [`LoopState`]s:
//!
//! ```text
//! Idle -> WaitingForReady -> Posting -> Sleeping -> Posting -> ... -> Stopped
//! ```
//!
//! The closed flag of the host is checked before every post. A failed post is
//! not retried: it stops the loop and is returned from [`BotListClient::run_loop`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::BotListError;
use crate::gateway::{response::is_truthy, Gateway, GatewayConfig};
use crate::host::{BotUser, HostBot};

/// Seconds between automatic guild count posts when no interval is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Shortest time allowed between automatic posts.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Phase of the periodic posting loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// The loop has not been started.
    Idle,
    /// Waiting for the host bot to report itself ready.
    WaitingForReady,
    /// A guild count post is in flight.
    Posting,
    /// Waiting out the interval before the next post.
    Sleeping,
    /// The host closed or a post failed; the loop has ended.
    Stopped,
}

/// Posts guild counts and looks up bots on behalf of a host bot.
///
/// Cloning is cheap; clones share the host bot, the gateway and the loop
/// state.
pub struct BotListClient<B: HostBot> {
    bot: Arc<B>,
    gateway: Arc<Gateway>,
    interval: Duration,
    state: Arc<watch::Sender<LoopState>>,
}

impl<B: HostBot> Clone for BotListClient<B> {
    fn clone(&self) -> Self {
        Self {
            bot: Arc::clone(&self.bot),
            gateway: Arc::clone(&self.gateway),
            interval: self.interval,
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: HostBot> BotListClient<B> {
    /// Creates a client for `bot` against the public botblock.org API, posting
    /// every 30 minutes once the loop is started.
    pub fn new(bot: Arc<B>) -> Result<Self, BotListError> {
        Ok(Self::with_gateway(bot, Gateway::new(GatewayConfig::default())?))
    }

    /// Creates a client for `bot` that talks through `gateway`.
    pub fn with_gateway(bot: Arc<B>, gateway: Gateway) -> Self {
        let (state, _) = watch::channel(LoopState::Idle);

        Self {
            bot,
            gateway: Arc::new(gateway),
            interval: DEFAULT_INTERVAL,
            state: Arc::new(state),
        }
    }

    /// Overrides the time between automatic posts.
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!(
                requested_ms = interval.as_millis() as u64,
                "Guild count interval too short, using {}s",
                MIN_INTERVAL.as_secs()
            );
        }
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn bot(&self) -> &Arc<B> {
        &self.bot
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Number of guilds the host bot is in right now.
    ///
    /// Read from the host on every call. Hosts that expose servers instead of
    /// guilds are counted through [`HostBot::server_count`].
    ///
    /// # Returns
    /// - `Ok(usize)` - Current guild count
    /// - `Err(BotListError::MissingCapability)` - Host exposes neither count
    pub fn guild_count(&self) -> Result<usize, BotListError> {
        self.bot
            .guild_count()
            .or_else(|| self.bot.server_count())
            .ok_or(BotListError::MissingCapability("a guild or server count"))
    }

    /// Alias of [`guild_count`](Self::guild_count).
    pub fn server_count(&self) -> Result<usize, BotListError> {
        self.guild_count()
    }

    pub fn set_credentials(&self, list_id: impl Into<String>, token: impl Into<String>) {
        self.gateway.set_credentials(list_id, token);
    }

    pub fn remove_credentials(&self, list_id: &str) {
        self.gateway.remove_credentials(list_id);
    }

    /// Posts the host bot's current guild count to botblock.org.
    pub async fn post_count(&self) -> Result<Value, BotListError> {
        let guild_count = self.guild_count()?;
        let bot_id = self.bot.user_id();

        debug!(bot_id, guild_count, "Posting guild count");

        self.gateway.post_guild_count(bot_id, guild_count).await
    }

    /// Spawns the periodic posting loop onto the current tokio runtime.
    ///
    /// Returns immediately. A failure inside the loop is logged and ends the
    /// loop; call [`run_loop`](Self::run_loop) directly to handle it yourself.
    /// Does nothing while a loop started from this client is still running.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    pub fn start_loop(&self) {
        if !self.claim_loop() {
            warn!("Guild count loop is already running");
            return;
        }

        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.posting_loop().await {
                error!("Guild count loop stopped: {}", e);
            }
        });
    }

    /// Runs the posting loop until the host bot closes.
    ///
    /// Waits for the host to become ready, then posts the guild count and
    /// sleeps for the configured interval, repeatedly. Only one loop runs per
    /// client at a time, whether started here or through
    /// [`start_loop`](Self::start_loop).
    ///
    /// # Returns
    /// - `Ok(())` - The host closed
    /// - `Err(BotListError::LoopAlreadyRunning)` - Another loop of this client is running
    /// - `Err(BotListError)` - A post failed; the loop ended at that post
    pub async fn run_loop(&self) -> Result<(), BotListError> {
        if !self.claim_loop() {
            return Err(BotListError::LoopAlreadyRunning);
        }

        self.posting_loop().await
    }

    /// Moves an idle or stopped loop to `WaitingForReady`, returning whether
    /// this caller now owns the loop.
    fn claim_loop(&self) -> bool {
        self.state.send_if_modified(|state| {
            if matches!(state, LoopState::Idle | LoopState::Stopped) {
                *state = LoopState::WaitingForReady;
                true
            } else {
                false
            }
        })
    }

    async fn posting_loop(&self) -> Result<(), BotListError> {
        self.bot.wait_until_ready().await;

        info!(
            interval_secs = self.interval.as_secs(),
            "Starting guild count loop"
        );

        while !self.bot.is_closed() {
            self.state.send_replace(LoopState::Posting);

            if let Err(e) = self.post_count().await {
                self.state.send_replace(LoopState::Stopped);
                return Err(e);
            }

            self.state.send_replace(LoopState::Sleeping);
            tokio::time::sleep(self.interval).await;
        }

        info!("Host bot closed, stopping guild count loop");
        self.state.send_replace(LoopState::Stopped);

        Ok(())
    }

    /// Current phase of the posting loop.
    pub fn loop_state(&self) -> LoopState {
        *self.state.borrow()
    }

    /// Receiver notified on every loop phase change.
    pub fn subscribe_loop_state(&self) -> watch::Receiver<LoopState> {
        self.state.subscribe()
    }

    /// Looks up a bot through both the host framework and botblock.org.
    ///
    /// When the host resolves the user, its name and discriminator replace the
    /// `username` and `discriminator` fields of the API result. A host lookup
    /// failure counts as an unknown user rather than an error.
    ///
    /// # Returns
    /// - `Ok((Some(user), json))` - Host knows the user, `json` carries its identity
    /// - `Ok((None, json))` - Only botblock.org knows the bot
    /// - `Err(BotListError::NotFound)` - Neither the host nor the API has a username
    /// - `Err(BotListError)` - The API request failed
    pub async fn get_bot(&self, bot_id: u64) -> Result<(Option<BotUser>, Value), BotListError> {
        let user = self.resolve_user(bot_id).await;

        let mut api_result = self.gateway.get_bot_info(bot_id).await?;

        if let Some(user) = &user {
            if is_truthy(&api_result) {
                if let Value::Object(fields) = &mut api_result {
                    fields.insert("username".to_string(), Value::String(user.name.clone()));
                    fields.insert(
                        "discriminator".to_string(),
                        Value::String(user.discriminator.clone()),
                    );
                }
            }
        }

        let has_username = api_result.get("username").is_some_and(is_truthy);
        if user.is_none() && !has_username {
            return Err(BotListError::NotFound);
        }

        Ok((user, api_result))
    }

    async fn resolve_user(&self, bot_id: u64) -> Option<BotUser> {
        let lookup = match self.bot.fetch_user(bot_id).await {
            Some(lookup) => lookup,
            None => self.bot.user_info(&bot_id.to_string()).await?,
        };

        match lookup {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(bot_id, "Host could not resolve user, treating as unknown: {}", e);
                None
            }
        }
    }
}
