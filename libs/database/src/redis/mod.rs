//! Redis connector and utilities
//!
//! Provides connection management backed by `redis::aio::ConnectionManager`,
//! which transparently handles reconnection.

mod connector;

pub use connector::{connect, connect_from_config, connect_from_config_with_retry, connect_with_retry};

// Re-export redis types for convenience
pub use redis::aio::ConnectionManager;
pub use redis::{AsyncCommands, Client, RedisResult};
