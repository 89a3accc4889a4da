//! Stream error types.

use thiserror::Error;

/// Event bus errors
#[derive(Error, Debug)]
pub enum StreamError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Append did not complete within the configured bound
    #[error("Append to '{stream}' timed out after {timeout_ms}ms")]
    AppendTimeout { stream: String, timeout_ms: u64 },
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Serialization(err.to_string())
    }
}
