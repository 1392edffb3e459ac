// src/ai/service.rs
// Assistant insights and metric suggestions, served from the AI cache when possible

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::cache::{AiCache, CacheType};
use crate::config::llm::AiCacheConfig;
use crate::error::{AppError, AppResult};
use crate::llm::{LlmProvider, Message};

use super::models::{ChatMessageInput, MetricSuggestion};
use super::prompts;

pub struct AiService {
    provider: Option<Arc<dyn LlmProvider>>,
    cache: Arc<AiCache>,
    ttl: AiCacheConfig,
}

impl AiService {
    /// `provider` is `None` when the assistant is disabled
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, cache: Arc<AiCache>, ttl: AiCacheConfig) -> Self {
        Self { provider, cache, ttl }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> AppResult<&Arc<dyn LlmProvider>> {
        self.provider
            .as_ref()
            .ok_or_else(|| AppError::Unavailable("AI assistant is disabled".to_string()))
    }

    /// Assistant reply for a conversation about the dashboard context
    pub async fn contextual_insight(&self, history: &[ChatMessageInput], context: &str) -> AppResult<String> {
        let provider = self.provider()?;
        let key = AiCache::insight_key(history, context)?;

        if let Some(cached) = self.cached(&key).await {
            match cached["content"].as_str() {
                Some(content) => return Ok(content.to_string()),
                None => warn!("Cached insight without content: key={}", key),
            }
        }

        let messages = history.iter().map(to_message).collect();
        let response = provider
            .chat(messages, prompts::insight_system(context))
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        info!(
            "{} insight generated in {}ms ({} output tokens)",
            provider.name(),
            response.latency_ms,
            response.tokens.output
        );

        let content = response.content.trim();
        if content.is_empty() {
            return Ok(prompts::FALLBACK_INSIGHT.to_string());
        }

        self.store(
            &key,
            &json!({ "content": content }),
            CacheType::DashboardInsight,
            self.ttl.insight_ttl_secs,
        )
        .await;

        Ok(content.to_string())
    }

    /// Units, emission factor and description proposed for a new metric
    pub async fn suggest_metric_details(&self, metric_name: &str) -> AppResult<MetricSuggestion> {
        if metric_name.trim().is_empty() {
            return Err(AppError::invalid_input("Metric name is required"));
        }

        let provider = self.provider()?;
        let key = AiCache::suggestion_key(metric_name);

        if let Some(cached) = self.cached(&key).await {
            match serde_json::from_value::<MetricSuggestion>(cached) {
                Ok(suggestion) => return Ok(suggestion),
                Err(e) => warn!("Ignoring unreadable cached suggestion {}: {}", key, e),
            }
        }

        let response = provider
            .chat(
                vec![Message::user(prompts::metric_suggestion_request(metric_name))],
                prompts::METRIC_SUGGESTION.to_string(),
            )
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        let Some(suggestion) = parse_suggestion(&response.content) else {
            warn!("Unparsable metric suggestion for '{}', using fallback", metric_name.trim());
            return Ok(fallback_suggestion());
        };

        match serde_json::to_value(&suggestion) {
            Ok(value) => {
                self.store(&key, &value, CacheType::MetricSuggestion, self.ttl.suggestion_ttl_secs)
                    .await
            }
            Err(e) => warn!("Failed to serialize suggestion {}: {}", key, e),
        }

        Ok(suggestion)
    }

    /// Cache lookup that never fails the request
    async fn cached(&self, key: &str) -> Option<Value> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("AI cache read failed for {}: {:#}", key, e);
                None
            }
        }
    }

    /// Best-effort cache write
    async fn store(&self, key: &str, value: &Value, cache_type: CacheType, ttl: i64) {
        if let Err(e) = self.cache.put(key, value, cache_type, ttl).await {
            warn!("AI cache write failed for {}: {:#}", key, e);
        } else {
            debug!("Stored {} in AI cache", key);
        }
    }
}

fn to_message(msg: &ChatMessageInput) -> Message {
    match msg.role.as_str() {
        "ai" | "assistant" => Message::assistant(msg.content.clone()),
        _ => Message::user(msg.content.clone()),
    }
}

/// Extract the JSON object from a model reply, tolerating code fences and prose
pub fn parse_suggestion(content: &str) -> Option<MetricSuggestion> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end < start {
        return None;
    }

    let suggestion: MetricSuggestion = serde_json::from_str(&content[start..=end]).ok()?;

    let units: Vec<String> = suggestion
        .units
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if units.is_empty() || !suggestion.emission_factor.is_finite() || suggestion.emission_factor < 0.0 {
        return None;
    }

    Some(MetricSuggestion {
        units,
        emission_factor: suggestion.emission_factor,
        description: suggestion.description.trim().to_string(),
    })
}

pub fn fallback_suggestion() -> MetricSuggestion {
    MetricSuggestion {
        units: vec!["unit".to_string()],
        emission_factor: 0.0,
        description: prompts::FALLBACK_SUGGESTION_DESCRIPTION.to_string(),
    }
}
