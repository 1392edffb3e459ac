// tests/common/mod.rs
// Shared test utilities: temp-file database, scripted LLM, tenant helpers

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tempfile::TempDir;

use ecotrack::auth::{AuthPayload, CurrentUser, RegisterCompanyInput};
use ecotrack::auth::models::{AdminCreateInput, CompanyCreateInput};
use ecotrack::config::AppConfig;
use ecotrack::config::llm::{AiCacheConfig, GroqConfig};
use ecotrack::config::server::{DatabaseConfig, LoggingConfig, ServerConfig};
use ecotrack::config::auth::AuthConfig;
use ecotrack::db::{create_pool, run_migrations};
use ecotrack::llm::{LlmProvider, Message, Response, TokenUsage};
use ecotrack::metrics::{Metric, MetricService};
use ecotrack::state::AppState;

pub const TEST_PASSWORD: &str = "correct horse battery";

/// LLM double that replays scripted replies and records every call
#[derive(Default)]
pub struct MockProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Vec<Message>, String)>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, content: &str) {
        self.replies.lock().unwrap().push_back(Ok(content.to_string()));
    }

    pub fn fail(&self, error: &str) {
        self.replies.lock().unwrap().push_back(Err(error.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages and system prompt of the most recent call
    pub fn last_request(&self) -> Option<(Vec<Message>, String)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn chat(&self, messages: Vec<Message>, system: String) -> Result<Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((messages, system));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("mock reply".to_string()));

        match reply {
            Ok(content) => Ok(Response {
                content,
                model: "mock-model".to_string(),
                tokens: TokenUsage::default(),
                latency_ms: 1,
            }),
            Err(e) => Err(anyhow!(e)),
        }
    }
}

pub fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origin: "*".to_string(),
            enable_graphiql: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        },
        groq: GroqConfig {
            enabled: true,
            api_key: "unused".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
            model: "mock-model".to_string(),
            timeout_secs: 1,
        },
        ai_cache: AiCacheConfig::default(),
    }
}

pub struct TestContext {
    _dir: TempDir,
    pub pool: SqlitePool,
    pub state: Arc<AppState>,
    pub llm: Arc<MockProvider>,
}

pub async fn setup() -> TestContext {
    setup_with(|_| {}, true).await
}

/// Build a context, letting the test adjust config. `ai` toggles the LLM.
pub async fn setup_with(adjust: impl FnOnce(&mut AppConfig), ai: bool) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("ecotrack-test.db").display());

    let mut config = test_config(&url);
    adjust(&mut config);

    let pool = create_pool(&url, config.database.max_connections).await.unwrap();
    run_migrations(&pool).await.unwrap();
    MetricService::new(pool.clone()).seed_default_metrics().await.unwrap();

    let llm = MockProvider::new();
    let provider: Option<Arc<dyn LlmProvider>> = if ai { Some(llm.clone() as Arc<dyn LlmProvider>) } else { None };
    let state = AppState::new(pool.clone(), config, provider);

    TestContext {
        _dir: dir,
        pool,
        state,
        llm,
    }
}

/// Register a company and return its manager's session
pub async fn register_company(state: &AppState, company: &str, email: &str) -> AuthPayload {
    state
        .auth
        .register_company(RegisterCompanyInput {
            company: CompanyCreateInput {
                name: company.to_string(),
                sector: "Manufacturing".to_string(),
                employees_count: 10,
            },
            admin: AdminCreateInput {
                name: format!("{} Manager", company),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
            },
        })
        .await
        .unwrap()
}

/// Caller decoded from a session token, as the HTTP layer would
pub fn viewer(state: &AppState, payload: &AuthPayload) -> CurrentUser {
    CurrentUser::from(state.jwt.verify_token(&payload.access_token).unwrap())
}

/// Global catalog metric by name
pub async fn catalog_metric(state: &AppState, company_id: &str, name: &str) -> Metric {
    state
        .metrics
        .find_all(company_id)
        .await
        .unwrap()
        .into_iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("metric {} not seeded", name))
}
