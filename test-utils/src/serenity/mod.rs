//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON,
//! simulating what Discord's API would return.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::create_test_user;
//!
//! let user = create_test_user(123456789, "Foo", Some(1));
//! assert_eq!(user.name, "Foo");
//! ```
//!
//! # Available Factories
//!
//! - `user::create_test_user` - Create Serenity User objects

pub mod user;

pub use user::create_test_user;
