//! Client for the [botblock.org](https://botblock.org) bot list aggregation API.
//!
//! Discord bot operators use botblock.org to report their guild count to many
//! bot lists at once and to look up aggregated bot information. This crate is
//! split into two layers:
//!
//! - **Gateway** ([`gateway`]) - HTTP access to the API, credential storage and
//!   response classification. Independent of any bot framework.
//! - **Bot adapter** ([`client`]) - Reads the guild count and identity of a
//!   [`HostBot`](host::HostBot) and posts on an interval from a background task.
//!
//! With the `serenity` feature (on by default) the [`discord`] module provides
//! a `HostBot` for Serenity bots.
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = BotListClient::new(host)?.with_interval(Duration::from_secs(900));
//! client.set_credentials("top.gg", top_gg_token);
//! client.start_loop();
//! ```

pub mod client;
pub mod config;
#[cfg(feature = "serenity")]
pub mod discord;
pub mod error;
pub mod gateway;
pub mod host;

pub use client::{BotListClient, LoopState, DEFAULT_INTERVAL, MIN_INTERVAL};
pub use error::BotListError;
pub use gateway::{CredentialStore, Gateway, GatewayConfig, API_BASE};
pub use host::{BotUser, HostBot, HostError};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
