// src/api/mod.rs

pub mod graphql;
pub mod health;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::graphql::build_schema;
use crate::state::AppState;

pub use health::{health_check, liveness_check, readiness_check};

/// Build the HTTP router: GraphQL endpoint plus health checks
pub fn create_router(state: Arc<AppState>) -> Result<Router> {
    let schema = build_schema(state.clone());

    let mut graphql_route = post(graphql::graphql_handler);
    if state.config.server.enable_graphiql {
        graphql_route = graphql_route.get(graphql::graphiql);
    }

    let router = Router::new()
        .route("/graphql", graphql_route)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .layer(Extension(schema))
        .layer(cors_layer(&state.config.server.cors_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn cors_layer(origin: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let origin = HeaderValue::from_str(origin.trim())
        .with_context(|| format!("Invalid ECOTRACK_CORS_ORIGIN: {}", origin))?;
    Ok(layer.allow_origin(origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_origin_parsing() {
        assert!(cors_layer("*").is_ok());
        assert!(cors_layer("https://app.ecotrack.io").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
