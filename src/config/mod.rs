// src/config/mod.rs
// Central configuration, composed from the per-domain configs

pub mod auth;
pub mod helpers;
pub mod llm;
pub mod server;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub database: server::DatabaseConfig,
    pub logging: server::LoggingConfig,
    pub auth: auth::AuthConfig,
    pub groq: llm::GroqConfig,
    pub ai_cache: llm::AiCacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // .env is optional in production
        dotenvy::dotenv().ok();

        Ok(Self {
            server: server::ServerConfig::from_env()?,
            database: server::DatabaseConfig::from_env()?,
            logging: server::LoggingConfig::from_env()?,
            auth: auth::AuthConfig::from_env()?,
            groq: llm::GroqConfig::from_env()?,
            ai_cache: llm::AiCacheConfig::from_env()?,
        })
    }

    /// Validate config on startup
    pub fn validate(&self) -> Result<()> {
        self.auth.validate()?;
        self.groq.validate()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        self.server.bind_address()
    }
}
