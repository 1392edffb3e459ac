// src/cache/mod.rs
// AI response cache: assistant insights and metric suggestions keyed by request

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::now;
use crate::error::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    DashboardInsight,
    MetricSuggestion,
}

impl CacheType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::DashboardInsight => "DASHBOARD_INSIGHT",
            CacheType::MetricSuggestion => "METRIC_SUGGESTION",
        }
    }
}

impl TryFrom<String> for CacheType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "DASHBOARD_INSIGHT" => Ok(CacheType::DashboardInsight),
            "METRIC_SUGGESTION" => Ok(CacheType::MetricSuggestion),
            _ => Err(UnknownVariant { kind: "cache type", value }),
        }
    }
}

/// Key components hashed for an insight. Field order is part of the key.
#[derive(Serialize)]
struct InsightKeyData<'a, M: Serialize> {
    history: &'a [M],
    context: &'a str,
}

/// Cache statistics for the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: i64,
    pub insight_entries: i64,
    pub suggestion_entries: i64,
    pub expired_entries: i64,
}

pub struct AiCache {
    db: SqlitePool,
    enabled: bool,
}

impl AiCache {
    pub fn new(db: SqlitePool, enabled: bool) -> Self {
        Self { db, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `insight_` + sha256 of the serialized history and context
    pub fn insight_key<M: Serialize>(history: &[M], context: &str) -> Result<String> {
        let json = serde_json::to_string(&InsightKeyData { history, context })?;
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("insight_{:x}", hasher.finalize()))
    }

    /// `suggestion_` + the trimmed, lower-cased metric name
    pub fn suggestion_key(metric_name: &str) -> String {
        format!("suggestion_{}", metric_name.trim().to_lowercase())
    }

    /// Stored response if present and not expired
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        if !self.enabled {
            return Ok(None);
        }

        let row: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT response, expires_at FROM ai_cache WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.db)
                .await?;

        let Some((response, expires_at)) = row else {
            debug!("Cache miss: key={}", key);
            return Ok(None);
        };

        if let Some(expires_at) = expires_at {
            if now() >= expires_at {
                debug!("Cache entry expired: key={}", key);
                self.delete(key).await?;
                return Ok(None);
            }
        }

        let value = serde_json::from_str(&response)
            .with_context(|| format!("Corrupt cache entry: key={}", key))?;

        debug!("Cache hit: key={}", key);
        Ok(Some(value))
    }

    /// Insert or replace an entry. A ttl of 0 stores it without expiry.
    pub async fn put(&self, key: &str, response: &Value, cache_type: CacheType, ttl_seconds: i64) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let ts = now();
        let expires_at = if ttl_seconds > 0 { Some(ts + ttl_seconds) } else { None };

        sqlx::query(
            r#"
            INSERT INTO ai_cache (key, response, cache_type, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                response = excluded.response,
                cache_type = excluded.cache_type,
                expires_at = excluded.expires_at,
                created_at = excluded.created_at
            "#,
        )
        .bind(key)
        .bind(serde_json::to_string(response)?)
        .bind(cache_type.as_str())
        .bind(expires_at)
        .bind(ts)
        .execute(&self.db)
        .await?;

        debug!("Cached {} response: key={}, ttl={}s", cache_type.as_str(), key, ttl_seconds);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM ai_cache WHERE key = ?")
            .bind(key)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Clean up expired cache entries
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM ai_cache WHERE expires_at IS NOT NULL AND expires_at <= ?")
            .bind(now())
            .execute(&self.db)
            .await?;

        let deleted = result.rows_affected();
        if deleted > 0 {
            info!("Cleaned up {} expired cache entries", deleted);
        }

        Ok(deleted)
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT cache_type, COUNT(*) FROM ai_cache GROUP BY cache_type")
                .fetch_all(&self.db)
                .await?;

        let mut stats = CacheStats::default();
        for (cache_type, count) in rows {
            stats.total_entries += count;
            match CacheType::try_from(cache_type) {
                Ok(CacheType::DashboardInsight) => stats.insight_entries += count,
                Ok(CacheType::MetricSuggestion) => stats.suggestion_entries += count,
                Err(e) => warn!("Skipping cache rows: {}", e),
            }
        }

        let expired: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM ai_cache WHERE expires_at IS NOT NULL AND expires_at <= ?")
                .bind(now())
                .fetch_one(&self.db)
                .await?;
        stats.expired_entries = expired.0;

        Ok(stats)
    }

    /// Clear all cache entries
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM ai_cache").execute(&self.db).await?;

        let deleted = result.rows_affected();
        warn!("Cleared all cache entries: {} deleted", deleted);
        Ok(deleted)
    }
}
