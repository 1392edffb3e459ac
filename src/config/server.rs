// src/config/server.rs
// Server, database, and logging configuration

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use super::helpers::{env_bool, env_or, env_parsed};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin, `*` for any
    pub cors_origin: String,
    pub enable_graphiql: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env_or("ECOTRACK_HOST", "0.0.0.0"),
            port: env_parsed("ECOTRACK_PORT", 3000)?,
            cors_origin: env_or("ECOTRACK_CORS_ORIGIN", "*"),
            enable_graphiql: env_bool("ECOTRACK_ENABLE_GRAPHIQL", false)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env_or("DATABASE_URL", "sqlite://ecotrack.db"),
            max_connections: env_parsed("ECOTRACK_SQLITE_MAX_CONNECTIONS", 5)?,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            level: env_or("ECOTRACK_LOG_LEVEL", "info"),
        };
        config.tracing_level()?;
        Ok(config)
    }

    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.level
            .trim()
            .parse()
            .map_err(|_| anyhow!("Failed to parse ECOTRACK_LOG_LEVEL={}", self.level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
        }
    }

    #[test]
    fn test_tracing_level_parsing() {
        assert_eq!(logging("debug").tracing_level().unwrap(), tracing::Level::DEBUG);
        assert_eq!(logging(" WARN ").tracing_level().unwrap(), tracing::Level::WARN);
        assert!(logging("chatty").tracing_level().is_err());
    }
}
