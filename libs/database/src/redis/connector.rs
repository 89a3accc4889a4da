use core_config::redis::RedisConfig;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Connect to Redis and return a ConnectionManager
///
/// The ConnectionManager automatically handles connection failures and
/// reconnections. The connection is verified with a PING before it is
/// handed out.
pub async fn connect(url: &str) -> DatabaseResult<ConnectionManager> {
    info!("Attempting to connect to Redis at {}", url);

    let client = Client::open(url)?;
    let manager = ConnectionManager::new(client).await?;

    let mut conn = manager.clone();
    let reply: String = redis::cmd("PING").query_async(&mut conn).await?;
    if reply != "PONG" {
        return Err(DatabaseError::ConnectionFailed(format!(
            "unexpected PING reply: {}",
            reply
        )));
    }

    info!("Successfully connected to Redis");
    Ok(manager)
}

/// Connect using a RedisConfig
pub async fn connect_from_config(config: &RedisConfig) -> DatabaseResult<ConnectionManager> {
    connect(&config.url).await
}

/// Connect to Redis with automatic retry on failure
///
/// Uses exponential backoff with jitter, useful for transient network
/// issues during startup.
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<ConnectionManager> {
    let url_owned = url.to_string();

    match retry_config {
        Some(config) => retry_with_backoff(|| connect(&url_owned), config).await,
        None => retry(|| connect(&url_owned)).await,
    }
}

/// Connect from config with automatic retry on failure
pub async fn connect_from_config_with_retry(
    config: &RedisConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<ConnectionManager> {
    connect_with_retry(&config.url, retry_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let err = connect("not-a-redis-url").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Redis(_)));
    }

    #[test]
    fn test_connection_failed_display() {
        let err = DatabaseError::ConnectionFailed("unexpected PING reply: NOPE".to_string());
        assert!(err.to_string().contains("NOPE"));
    }
}
