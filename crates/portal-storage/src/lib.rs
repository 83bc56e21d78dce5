//! Key-value store backends for Portal.
//!
//! [`InMemoryStore`] keeps everything in process and evaluates expiry against
//! a [`Clock`](portal_core::Clock); [`RedisStore`] maps each namespace onto a
//! logical Redis database.

pub mod memory;
pub mod redis;

pub use memory::{InMemoryStore, ManualClock};
pub use self::redis::{RedisSettings, RedisStore};
