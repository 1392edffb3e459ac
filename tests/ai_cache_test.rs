// tests/ai_cache_test.rs
// Assistant insights and metric suggestions through the AI cache

mod common;

use common::{setup, setup_with};
use ecotrack::ai::ChatMessageInput;
use ecotrack::cache::{AiCache, CacheType};
use ecotrack::config::server::DatabaseConfig;
use ecotrack::db::open_database;
use serde_json::json;

fn history(text: &str) -> Vec<ChatMessageInput> {
    vec![
        ChatMessageInput {
            role: "ai".to_string(),
            content: "¡Hola! ¿En qué te ayudo?".to_string(),
        },
        ChatMessageInput {
            role: "user".to_string(),
            content: text.to_string(),
        },
    ]
}

const CONTEXT: &str = "Energía: 120 kWh (-10%), Agua: 30 m3 (+5%)";

#[tokio::test]
async fn test_insight_cache_hit_skips_llm() {
    let ctx = setup().await;
    ctx.llm.reply("Reduce el consumo nocturno.");

    let first = ctx.state.ai.contextual_insight(&history("¿Cómo voy?"), CONTEXT).await.unwrap();
    let second = ctx.state.ai.contextual_insight(&history("¿Cómo voy?"), CONTEXT).await.unwrap();

    assert_eq!(first, "Reduce el consumo nocturno.");
    assert_eq!(second, first);
    assert_eq!(ctx.llm.calls(), 1);

    // A different question misses
    ctx.state.ai.contextual_insight(&history("¿Y el agua?"), CONTEXT).await.unwrap();
    assert_eq!(ctx.llm.calls(), 2);
}

#[tokio::test]
async fn test_insight_prompt_and_role_mapping() {
    let ctx = setup().await;
    ctx.llm.reply("ok");

    ctx.state.ai.contextual_insight(&history("¿Cómo voy?"), CONTEXT).await.unwrap();

    let (messages, system) = ctx.llm.last_request().unwrap();
    assert!(system.contains("EcoAssistant"));
    assert!(system.contains(CONTEXT));
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "assistant");
    assert_eq!(messages[1].role, "user");
}

#[tokio::test]
async fn test_empty_reply_uses_fallback_and_is_not_cached() {
    let ctx = setup().await;
    ctx.llm.reply("   ");
    ctx.llm.reply("Segunda respuesta");

    let first = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap();
    assert_eq!(first, ecotrack::ai::prompts::FALLBACK_INSIGHT);

    let second = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap();
    assert_eq!(second, "Segunda respuesta");
    assert_eq!(ctx.llm.calls(), 2);
}

#[tokio::test]
async fn test_missing_cache_table_does_not_fail_requests() {
    let ctx = setup().await;
    sqlx::query("DROP TABLE ai_cache").execute(&ctx.pool).await.unwrap();
    ctx.llm.reply("Sin caché");
    ctx.llm.reply(r#"{"units": ["kg"], "emissionFactor": 1.5, "description": "Papel"}"#);

    let insight = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap();
    assert_eq!(insight, "Sin caché");

    let suggestion = ctx.state.ai.suggest_metric_details("Papel").await.unwrap();
    assert_eq!(suggestion.emission_factor, 1.5);
}

#[tokio::test]
async fn test_llm_failure_is_llm_error() {
    let ctx = setup().await;
    ctx.llm.fail("API returned 503 Service Unavailable: overloaded");

    let err = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap_err();
    assert_eq!(err.code(), "LLM_ERROR");
}

#[tokio::test]
async fn test_disabled_assistant_is_unavailable() {
    let ctx = setup_with(|_| {}, false).await;

    let err = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap_err();
    assert_eq!(err.code(), "SERVICE_UNAVAILABLE");

    let err = ctx.state.ai.suggest_metric_details("Gas").await.unwrap_err();
    assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_suggestion_cached_by_normalized_name() {
    let ctx = setup().await;
    ctx.llm.reply("```json\n{\"units\": [\"m3\", \"kWh\"], \"emissionFactor\": 2.0, \"description\": \"Gas natural\"}\n```");

    let first = ctx.state.ai.suggest_metric_details("  Gas Natural ").await.unwrap();
    let second = ctx.state.ai.suggest_metric_details("gas natural").await.unwrap();

    assert_eq!(first.units, vec!["m3", "kWh"]);
    assert_eq!(first, second);
    assert_eq!(ctx.llm.calls(), 1);

    let stored = ctx.state.cache.get(&AiCache::suggestion_key("GAS NATURAL")).await.unwrap();
    assert_eq!(stored.unwrap()["emissionFactor"], json!(2.0));
}

#[tokio::test]
async fn test_unparsable_suggestion_falls_back_without_caching() {
    let ctx = setup().await;
    ctx.llm.reply("I am not sure about that metric.");

    let suggestion = ctx.state.ai.suggest_metric_details("Biogás").await.unwrap();
    assert_eq!(suggestion.units, vec!["unit"]);
    assert_eq!(suggestion.emission_factor, 0.0);

    ctx.state.ai.suggest_metric_details("Biogás").await.unwrap();
    assert_eq!(ctx.llm.calls(), 2);
}

#[tokio::test]
async fn test_blank_metric_name_is_rejected() {
    let ctx = setup().await;

    let err = ctx.state.ai.suggest_metric_details("   ").await.unwrap_err();
    assert_eq!(err.code(), "BAD_USER_INPUT");
    assert_eq!(ctx.llm.calls(), 0);
}

#[tokio::test]
async fn test_expired_entry_is_a_miss_and_is_deleted() {
    let ctx = setup().await;
    let key = AiCache::suggestion_key("agua");

    sqlx::query(
        "INSERT INTO ai_cache (key, response, cache_type, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&key)
    .bind(r#"{"units": ["m3"], "emissionFactor": 0.3, "description": "Agua"}"#)
    .bind(CacheType::MetricSuggestion.as_str())
    .bind(1_i64)
    .bind(0_i64)
    .execute(&ctx.pool)
    .await
    .unwrap();

    assert!(ctx.state.cache.get(&key).await.unwrap().is_none());

    let remaining: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ai_cache WHERE key = ?")
        .bind(&key)
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    assert_eq!(remaining.0, 0);
}

#[tokio::test]
async fn test_ttl_controls_expiry_column() {
    let ctx = setup().await;

    ctx.state
        .cache
        .put("insight_a", &json!({"content": "a"}), CacheType::DashboardInsight, 60)
        .await
        .unwrap();
    ctx.state
        .cache
        .put("suggestion_b", &json!({"units": ["kg"]}), CacheType::MetricSuggestion, 0)
        .await
        .unwrap();

    let rows: Vec<(String, Option<i64>)> = sqlx::query_as("SELECT key, expires_at FROM ai_cache ORDER BY key")
        .fetch_all(&ctx.pool)
        .await
        .unwrap();

    assert_eq!(rows[0].0, "insight_a");
    assert!(rows[0].1.is_some());
    assert_eq!(rows[1], ("suggestion_b".to_string(), None));
}

#[tokio::test]
async fn test_disabled_cache_always_misses() {
    let ctx = setup_with(|config| config.ai_cache.enabled = false, true).await;
    ctx.llm.reply("uno");
    ctx.llm.reply("dos");

    let first = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap();
    let second = ctx.state.ai.contextual_insight(&history("hola"), CONTEXT).await.unwrap();

    assert_eq!((first.as_str(), second.as_str()), ("uno", "dos"));
    assert_eq!(ctx.llm.calls(), 2);
}

#[tokio::test]
async fn test_prune_stats_and_clear() {
    let ctx = setup().await;
    let cache = &ctx.state.cache;

    cache
        .put("insight_live", &json!({"content": "x"}), CacheType::DashboardInsight, 3600)
        .await
        .unwrap();
    cache
        .put("suggestion_live", &json!({"units": ["kg"]}), CacheType::MetricSuggestion, 0)
        .await
        .unwrap();
    sqlx::query("INSERT INTO ai_cache (key, response, cache_type, expires_at, created_at) VALUES ('insight_old', '{}', 'DASHBOARD_INSIGHT', 1, 0)")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.insight_entries, 2);
    assert_eq!(stats.suggestion_entries, 1);
    assert_eq!(stats.expired_entries, 1);

    assert_eq!(cache.cleanup_expired().await.unwrap(), 1);
    assert_eq!(cache.clear().await.unwrap(), 2);
    assert_eq!(cache.stats().await.unwrap().total_entries, 0);
}

#[tokio::test]
async fn test_cache_maintenance_needs_only_database_settings() {
    let dir = tempfile::tempdir().unwrap();
    let database = DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("maintenance.db").display()),
        max_connections: 1,
    };

    let pool = open_database(&database).await.unwrap();
    let cache = AiCache::new(pool.clone(), true);
    cache
        .put("suggestion_papel", &json!({"units": ["kg"]}), CacheType::MetricSuggestion, 0)
        .await
        .unwrap();
    pool.close().await;

    // Reopening an up-to-date schema is a no-op
    let pool = open_database(&database).await.unwrap();
    let cache = AiCache::new(pool, true);
    assert_eq!(cache.stats().await.unwrap().suggestion_entries, 1);
    assert_eq!(cache.cleanup_expired().await.unwrap(), 0);
}
