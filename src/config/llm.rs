// src/config/llm.rs
// LLM provider (Groq) and AI cache configuration

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use super::helpers::{env_bool, env_or, env_parsed};

/// Groq chat completions configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GroqConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            enabled: env_bool("AI_ENABLED", true)?,
            api_key: env_or("GROQ_API_KEY", ""),
            base_url: env_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            model: env_or("GROQ_MODEL", "llama-3.3-70b-versatile"),
            timeout_secs: env_parsed("GROQ_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.api_key.trim().is_empty() {
            return Err(anyhow!(
                "GROQ_API_KEY is required when the AI assistant is enabled (set AI_ENABLED=false to run without it)"
            ));
        }

        Ok(())
    }
}

/// AI response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiCacheConfig {
    pub enabled: bool,
    /// Seconds an insight stays valid, 0 for no expiry
    pub insight_ttl_secs: i64,
    /// Seconds a metric suggestion stays valid, 0 for no expiry
    pub suggestion_ttl_secs: i64,
}

impl AiCacheConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            enabled: env_bool("AI_CACHE_ENABLED", true)?,
            insight_ttl_secs: env_parsed("AI_INSIGHT_TTL_SECS", 86_400)?,
            suggestion_ttl_secs: env_parsed("AI_SUGGESTION_TTL_SECS", 0)?,
        })
    }
}

impl Default for AiCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            insight_ttl_secs: 86_400,
            suggestion_ttl_secs: 0,
        }
    }
}
