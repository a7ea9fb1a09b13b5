//! Botblock Test Utils
//!
//! Provides shared testing utilities for the botblock client. This crate offers a
//! configurable stand-in for a host bot and factories for Serenity models.
//!
//! # Overview
//!
//! - **MockHost**: `HostBot` implementation with toggleable capabilities, readiness
//!   and shutdown, built through `MockHost::builder()`
//! - **serenity**: Factories building Serenity structs from JSON
//! - **TestError**: Errors returned by failing mock lookups
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::host::MockHost;
//!
//! #[tokio::test]
//! async fn posts_current_guild_count() {
//!     let host = MockHost::builder()
//!         .user_id(123)
//!         .guilds(42)
//!         .ready(true)
//!         .build();
//!
//!     let client = BotListClient::with_gateway(Arc::new(host), gateway);
//!     // Perform client operations...
//! }
//! ```

pub mod error;
pub mod host;
pub mod serenity;
