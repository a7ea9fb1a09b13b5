//! [`HostBot`] implementation for bots built on Serenity.
//!
//! Serenity exposes its cache and HTTP client only after the client has been
//! built, while the readiness event has to be wired in before. [`ReadySignal`]
//! is therefore registered as an event handler first and handed to
//! [`SerenityHost`] afterwards:
//!
//! ```rust,ignore
//! let signal = ReadySignal::new();
//! let mut client = Client::builder(&token, GatewayIntents::GUILDS)
//!     .event_handler(signal.clone())
//!     .await?;
//! let host = Arc::new(SerenityHost::new(client.cache.clone(), client.http.clone(), signal));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{Cache, Context, EventHandler, Http, Ready, User, UserId};
use tokio::sync::watch;
use tracing::info;

use crate::host::{BotUser, HostBot, HostError};

impl From<&User> for BotUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.clone(),
            discriminator: user
                .discriminator
                .map(|d| format!("{:04}", d.get()))
                .unwrap_or_else(|| "0".to_string()),
        }
    }
}

/// Readiness and shutdown flags of a Serenity bot.
///
/// Register a clone as an event handler; the `ready` event marks the bot ready.
#[derive(Clone)]
pub struct ReadySignal {
    ready: Arc<watch::Sender<bool>>,
    closed: Arc<AtomicBool>,
}

impl ReadySignal {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);

        Self {
            ready: Arc::new(ready),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    /// Marks the bot as shut down, ending any running guild count loop before
    /// its next post.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        let mut rx = self.ready.subscribe();
        // The sender is owned by `self`, so the channel cannot close while waiting.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventHandler for ReadySignal {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "{} is connected to Discord in {} guilds",
            ready.user.name,
            ready.guilds.len()
        );

        self.mark_ready();
    }
}

/// A Serenity bot seen through the [`HostBot`] interface.
pub struct SerenityHost {
    cache: Arc<Cache>,
    http: Arc<Http>,
    signal: ReadySignal,
}

impl SerenityHost {
    pub fn new(cache: Arc<Cache>, http: Arc<Http>, signal: ReadySignal) -> Self {
        Self {
            cache,
            http,
            signal,
        }
    }

    pub fn signal(&self) -> &ReadySignal {
        &self.signal
    }
}

#[async_trait]
impl HostBot for SerenityHost {
    fn user_id(&self) -> u64 {
        self.cache.current_user().id.get()
    }

    fn guild_count(&self) -> Option<usize> {
        Some(self.cache.guilds().len())
    }

    async fn fetch_user(&self, user_id: u64) -> Option<Result<BotUser, HostError>> {
        if user_id == 0 {
            return Some(Err("user ID 0 is not a valid snowflake".into()));
        }

        let result = self
            .http
            .get_user(UserId::new(user_id))
            .await
            .map(|user| BotUser::from(&user))
            .map_err(HostError::from);

        Some(result)
    }

    async fn wait_until_ready(&self) {
        self.signal.wait().await;
    }

    fn is_closed(&self) -> bool {
        self.signal.is_closed()
    }
}
