//! Host bot framework abstraction.
//!
//! [`HostBot`] describes what the bot adapter needs from the bot it reports
//! for. Capabilities that differ between framework generations are modelled as
//! optional methods with a default "not exposed" implementation, and the
//! adapter calls them in a fixed preference order:
//!
//! | Capability        | Preferred          | Fallback              |
//! |-------------------|--------------------|-----------------------|
//! | Membership count  | [`HostBot::guild_count`] | [`HostBot::server_count`] |
//! | User lookup       | [`HostBot::fetch_user`]  | [`HostBot::user_info`]    |
//!
//! An implementation only overrides the methods its framework supports.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error raised by a host framework while resolving a user.
pub type HostError = Box<dyn std::error::Error + Send + Sync>;

/// Framework-neutral identity of a Discord user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotUser {
    pub id: u64,
    pub name: String,
    /// Four-digit discriminator as displayed by Discord, `"0"` for users on the
    /// unique username system.
    pub discriminator: String,
}

#[async_trait]
pub trait HostBot: Send + Sync + 'static {
    /// ID of the bot's own user.
    fn user_id(&self) -> u64;

    /// Number of guilds the bot is currently in, if the host exposes guilds.
    fn guild_count(&self) -> Option<usize> {
        None
    }

    /// Number of servers the bot is currently in, for hosts that call guilds
    /// servers.
    fn server_count(&self) -> Option<usize> {
        None
    }

    /// Resolves a user through the host's current lookup API.
    ///
    /// `None` means the host does not offer this lookup.
    async fn fetch_user(&self, _user_id: u64) -> Option<Result<BotUser, HostError>> {
        None
    }

    /// Resolves a user through the host's legacy lookup API.
    ///
    /// `None` means the host does not offer this lookup.
    async fn user_info(&self, _user_id: &str) -> Option<Result<BotUser, HostError>> {
        None
    }

    /// Completes once the host has connected and populated its state.
    async fn wait_until_ready(&self);

    /// Whether the host has shut down.
    fn is_closed(&self) -> bool;
}
