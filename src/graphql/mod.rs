// src/graphql/mod.rs
// GraphQL schema: one query and one mutation object per domain, merged at the root

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, MergedObject, Schema};
use chrono::{DateTime, Utc};

use crate::auth::{CurrentUser, Role, require_user};
use crate::error::GqlResultExt;
use crate::state::AppState;

mod ai;
mod auth;
mod companies;
mod dashboard;
mod goals;
mod impact;
mod metrics;
mod objects;
mod users;

pub const MAX_QUERY_DEPTH: usize = 12;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    companies::CompanyQuery,
    users::UserQuery,
    metrics::MetricQuery,
    goals::GoalQuery,
    impact::ImpactQuery,
    dashboard::DashboardQuery,
    ai::AiQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    auth::AuthMutation,
    companies::CompanyMutation,
    users::UserMutation,
    metrics::MetricMutation,
    goals::GoalMutation,
    impact::ImpactMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Caller of the current request; `None` for anonymous requests
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<CurrentUser>);

pub fn build_schema(state: Arc<AppState>) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

pub(crate) fn app_state<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a AppState> {
    Ok(ctx.data::<Arc<AppState>>()?.as_ref())
}

/// The authenticated caller, or UNAUTHENTICATED
pub(crate) fn current_user<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a CurrentUser> {
    let viewer = ctx.data_opt::<Viewer>().and_then(|v| v.0.as_ref());
    require_user(viewer).gql()
}

/// The authenticated caller, provided it holds one of `roles`
pub(crate) fn require_role<'a>(ctx: &Context<'a>, roles: &[Role]) -> async_graphql::Result<&'a CurrentUser> {
    let user = current_user(ctx)?;
    user.require_role(roles).gql()?;
    Ok(user)
}

/// Unix seconds as a GraphQL DateTime
pub(crate) fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
