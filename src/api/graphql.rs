// src/api/graphql.rs

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    response::{Html, IntoResponse},
};
use tracing::debug;

use crate::auth::CurrentUser;
use crate::graphql::{AppSchema, Viewer};
use crate::state::AppState;

/// POST /graphql
pub async fn graphql_handler(
    State(state): State<Arc<AppState>>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let viewer = Viewer(viewer_from_headers(&state, &headers));
    Json(schema.execute(request.data(viewer)).await)
}

/// GET /graphql, only routed when GraphiQL is enabled
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Decode the bearer token. A missing or invalid token makes the request anonymous.
fn viewer_from_headers(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    match state.jwt.verify_token(token) {
        Ok(claims) => Some(CurrentUser::from(claims)),
        Err(e) => {
            debug!("Ignoring bearer token: {}", e);
            None
        }
    }
}
