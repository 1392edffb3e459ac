// src/config/auth.rs
// JWT and password hashing configuration

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use super::helpers::{env_parsed, require_env};

/// One year
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            jwt_secret: require_env("JWT_SECRET")?,
            token_ttl_hours: env_parsed("JWT_TTL_HOURS", 24)?,
            bcrypt_cost: env_parsed("BCRYPT_COST", 10)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 16 {
            return Err(anyhow!("JWT_SECRET must be at least 16 characters"));
        }

        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.token_ttl_hours) {
            return Err(anyhow!("JWT_TTL_HOURS must be between 1 and {}", MAX_TOKEN_TTL_HOURS));
        }

        // bcrypt accepts costs 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(anyhow!("BCRYPT_COST must be between 4 and 31"));
        }

        Ok(())
    }
}
