// src/state.rs
// Shared application state handed to the router and the GraphQL schema

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::ai::AiService;
use crate::auth::{AuthService, JwtManager};
use crate::cache::AiCache;
use crate::companies::CompanyService;
use crate::config::AppConfig;
use crate::dashboard::DashboardService;
use crate::goals::GoalService;
use crate::impact::ImpactService;
use crate::llm::LlmProvider;
use crate::metrics::MetricService;
use crate::users::UserService;

pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    pub jwt: JwtManager,
    pub auth: AuthService,
    pub users: UserService,
    pub companies: CompanyService,
    pub metrics: MetricService,
    pub goals: GoalService,
    pub impact: ImpactService,
    pub dashboard: DashboardService,
    pub cache: Arc<AiCache>,
    pub ai: AiService,
}

impl AppState {
    /// Wire every service over one pool. `llm` is `None` when the assistant is disabled.
    pub fn new(db: SqlitePool, config: AppConfig, llm: Option<Arc<dyn LlmProvider>>) -> Arc<Self> {
        let jwt = JwtManager::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
        let cache = Arc::new(AiCache::new(db.clone(), config.ai_cache.enabled));

        Arc::new(Self {
            auth: AuthService::new(db.clone(), jwt.clone(), config.auth.bcrypt_cost),
            users: UserService::new(db.clone()),
            companies: CompanyService::new(db.clone()),
            metrics: MetricService::new(db.clone()),
            goals: GoalService::new(db.clone()),
            impact: ImpactService::new(db.clone()),
            dashboard: DashboardService::new(db.clone()),
            ai: AiService::new(llm, cache.clone(), config.ai_cache.clone()),
            cache,
            jwt,
            db,
            config,
        })
    }
}
