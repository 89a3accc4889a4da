use crate::{env_required, ConfigError, FromEnv};

/// Redis configuration
///
/// Redis backs both the event stream (`tasks_topic`) and the per-group
/// task cache, so every service in the workspace loads this.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl FromEnv for RedisConfig {
    /// Requires REDIS_HOST to be set (no default)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_required("REDIS_HOST")?,
        })
    }
}
