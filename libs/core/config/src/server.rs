use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};

/// HTTP server configuration for the real-time gateway
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads GATEWAY_HOST (default "0.0.0.0") and GATEWAY_PORT (default 8080)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("GATEWAY_HOST", "0.0.0.0"),
            port: env_parse_or_default("GATEWAY_PORT", 8080)?,
        })
    }
}
