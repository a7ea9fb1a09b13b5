//! Configurable `HostBot` stand-in.
//!
//! `MockHost` lets tests choose which host capabilities exist, what user lookups
//! return, and when the host becomes ready or closes. Counts can be changed while
//! a client holds the host to check that they are read live.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use botblock::{BotUser, HostBot, HostError};
use tokio::sync::watch;

use crate::error::TestError;

/// Outcome of a mock user lookup.
#[derive(Debug, Clone)]
pub enum UserLookup {
    /// The host does not offer this lookup.
    Absent,
    /// The lookup returns this user.
    Found(BotUser),
    /// The lookup fails with this reason.
    Fails(String),
}

/// Test double for a host bot.
pub struct MockHost {
    user_id: u64,
    guilds: Mutex<Option<usize>>,
    servers: Mutex<Option<usize>>,
    fetch_user: UserLookup,
    user_info: UserLookup,
    fetch_calls: AtomicUsize,
    user_info_calls: AtomicUsize,
    ready: watch::Sender<bool>,
    closed: AtomicBool,
}

impl MockHost {
    /// Starts building a host with user ID 1, no capabilities, not ready and open.
    pub fn builder() -> MockHostBuilder {
        MockHostBuilder::new()
    }

    pub fn set_guilds(&self, count: Option<usize>) {
        *self.guilds.lock().unwrap() = count;
    }

    pub fn set_servers(&self, count: Option<usize>) {
        *self.servers.lock().unwrap() = count;
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Number of times the current user lookup was called.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of times the legacy user lookup was called.
    pub fn user_info_calls(&self) -> usize {
        self.user_info_calls.load(Ordering::SeqCst)
    }

    fn lookup(lookup: &UserLookup, user_id: String) -> Option<Result<BotUser, HostError>> {
        match lookup {
            UserLookup::Absent => None,
            UserLookup::Found(user) => Some(Ok(user.clone())),
            UserLookup::Fails(reason) => Some(Err(Box::new(TestError::UserLookup {
                user_id,
                reason: reason.clone(),
            }))),
        }
    }
}

#[async_trait]
impl HostBot for MockHost {
    fn user_id(&self) -> u64 {
        self.user_id
    }

    fn guild_count(&self) -> Option<usize> {
        *self.guilds.lock().unwrap()
    }

    fn server_count(&self) -> Option<usize> {
        *self.servers.lock().unwrap()
    }

    async fn fetch_user(&self, user_id: u64) -> Option<Result<BotUser, HostError>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.fetch_user, user_id.to_string())
    }

    async fn user_info(&self, user_id: &str) -> Option<Result<BotUser, HostError>> {
        self.user_info_calls.fetch_add(1, Ordering::SeqCst);
        Self::lookup(&self.user_info, user_id.to_string())
    }

    async fn wait_until_ready(&self) {
        let mut rx = self.ready.subscribe();
        let _ = rx.wait_for(|ready| *ready).await;
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Builder for [`MockHost`].
///
/// # Example
///
/// ```rust,ignore
/// let host = MockHost::builder()
///     .user_id(123)
///     .servers(5)
///     .user_info(UserLookup::Fails("gone".into()))
///     .build();
/// ```
pub struct MockHostBuilder {
    user_id: u64,
    guilds: Option<usize>,
    servers: Option<usize>,
    fetch_user: UserLookup,
    user_info: UserLookup,
    ready: bool,
}

impl MockHostBuilder {
    pub fn new() -> Self {
        Self {
            user_id: 1,
            guilds: None,
            servers: None,
            fetch_user: UserLookup::Absent,
            user_info: UserLookup::Absent,
            ready: false,
        }
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Exposes a guild collection of `count` guilds.
    pub fn guilds(mut self, count: usize) -> Self {
        self.guilds = Some(count);
        self
    }

    /// Exposes a server collection of `count` servers.
    pub fn servers(mut self, count: usize) -> Self {
        self.servers = Some(count);
        self
    }

    pub fn fetch_user(mut self, lookup: UserLookup) -> Self {
        self.fetch_user = lookup;
        self
    }

    pub fn user_info(mut self, lookup: UserLookup) -> Self {
        self.user_info = lookup;
        self
    }

    pub fn ready(mut self, ready: bool) -> Self {
        self.ready = ready;
        self
    }

    pub fn build(self) -> MockHost {
        let (ready, _) = watch::channel(self.ready);

        MockHost {
            user_id: self.user_id,
            guilds: Mutex::new(self.guilds),
            servers: Mutex::new(self.servers),
            fetch_user: self.fetch_user,
            user_info: self.user_info,
            fetch_calls: AtomicUsize::new(0),
            user_info_calls: AtomicUsize::new(0),
            ready,
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for MockHostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience constructor for a [`BotUser`].
pub fn bot_user(id: u64, name: &str, discriminator: &str) -> BotUser {
    BotUser {
        id,
        name: name.to_string(),
        discriminator: discriminator.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn capabilities_default_to_absent() {
        let host = MockHost::builder().build();

        assert_eq!(host.guild_count(), None);
        assert_eq!(host.server_count(), None);
        assert!(host.fetch_user(1).await.is_none());
        assert!(host.user_info("1").await.is_none());
        assert_eq!(host.fetch_calls(), 1);
        assert_eq!(host.user_info_calls(), 1);
    }

    #[tokio::test]
    async fn failing_lookup_returns_error() {
        let host = MockHost::builder()
            .fetch_user(UserLookup::Fails("unknown user".to_string()))
            .build();

        let err = host.fetch_user(5).await.unwrap().unwrap_err();
        assert!(err.to_string().contains("unknown user"));
    }

    #[tokio::test]
    async fn wait_until_ready_unblocks_after_mark_ready() {
        let host = std::sync::Arc::new(MockHost::builder().build());
        let waiter = std::sync::Arc::clone(&host);

        let task = tokio::spawn(async move { waiter.wait_until_ready().await });
        host.mark_ready();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
