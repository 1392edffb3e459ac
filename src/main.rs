// src/main.rs

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use ecotrack::api::create_router;
use ecotrack::auth::AuthService;
use ecotrack::auth::JwtManager;
use ecotrack::cache::AiCache;
use ecotrack::config::AppConfig;
use ecotrack::config::server::{DatabaseConfig, LoggingConfig};
use ecotrack::db::open_database;
use ecotrack::llm::{GroqProvider, LlmProvider};
use ecotrack::metrics::MetricService;
use ecotrack::state::AppState;

#[derive(Parser)]
#[command(name = "ecotrack")]
#[command(about = "Sustainability tracking backend: GraphQL API and AI assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate, seed and serve the GraphQL API (default)
    Serve,

    /// Apply migrations and seed the default metric catalog, then exit
    Migrate,

    /// Create a platform super admin
    CreateSuperAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ECOTRACK_ADMIN_PASSWORD")]
        password: String,
    },

    /// Inspect or prune the AI response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Delete expired entries
    Prune,
    /// Print entry counts per type
    Stats,
    /// Delete every entry
    Clear,
}

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

/// Open the pool, bring the schema up to date and seed the catalog
async fn prepare_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = open_database(config).await?;

    let seeded = MetricService::new(pool.clone()).seed_default_metrics().await?;
    if seeded > 0 {
        info!("Default metric catalog updated ({} metrics)", seeded);
    }

    Ok(pool)
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;
    let pool = prepare_database(&config.database).await?;

    let llm: Option<Arc<dyn LlmProvider>> = if config.groq.enabled {
        let provider = GroqProvider::from_config(&config.groq)?;
        info!("AI assistant enabled (model {})", provider.model());
        Some(Arc::new(provider))
    } else {
        info!("AI assistant disabled");
        None
    };

    info!(
        "AI cache: {} (insight ttl {}s, suggestion ttl {}s)",
        if config.ai_cache.enabled { "enabled" } else { "disabled" },
        config.ai_cache.insight_ttl_secs,
        config.ai_cache.suggestion_ttl_secs
    );

    let bind_address = config.bind_address();
    let graphiql = config.server.enable_graphiql;
    let state = AppState::new(pool.clone(), config, llm);
    let app = create_router(state)?;

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("GraphQL endpoint: http://{}/graphql", bind_address);
    if graphiql {
        info!("GraphiQL enabled on GET /graphql");
    }
    info!("Health endpoints: /health, /ready, /live");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down gracefully...");
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn create_super_admin(config: AppConfig, name: &str, email: &str, password: &str) -> Result<()> {
    config.auth.validate()?;
    let pool = prepare_database(&config.database).await?;

    let jwt = JwtManager::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
    let auth = AuthService::new(pool.clone(), jwt, config.auth.bcrypt_cost);
    let user = auth.create_super_admin(name, email, password).await?;

    println!("Created super admin {} ({})", user.email, user.id);
    pool.close().await;
    Ok(())
}

async fn run_cache_command(config: &DatabaseConfig, action: CacheAction) -> Result<()> {
    let pool = open_database(config).await?;
    let cache = AiCache::new(pool.clone(), true);

    match action {
        CacheAction::Prune => {
            let deleted = cache.cleanup_expired().await?;
            println!("Deleted {} expired entries", deleted);
        }
        CacheAction::Stats => {
            let stats = cache.stats().await?;
            println!("Total entries:      {}", stats.total_entries);
            println!("Dashboard insights: {}", stats.insight_entries);
            println!("Metric suggestions: {}", stats.suggestion_entries);
            println!("Expired:            {}", stats.expired_entries);
        }
        CacheAction::Clear => {
            let deleted = cache.clear().await?;
            println!("Deleted {} entries", deleted);
        }
    }

    pool.close().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional in production
    dotenvy::dotenv().ok();
    let logging = LoggingConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(logging.tracing_level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Maintenance commands only need the database settings
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(AppConfig::from_env()?).await,
        Commands::Migrate => {
            let pool = prepare_database(&DatabaseConfig::from_env()?).await?;
            pool.close().await;
            info!("Database ready");
            Ok(())
        }
        Commands::CreateSuperAdmin { name, email, password } => {
            create_super_admin(AppConfig::from_env()?, &name, &email, &password).await
        }
        Commands::Cache { action } => run_cache_command(&DatabaseConfig::from_env()?, action).await,
    }
}
