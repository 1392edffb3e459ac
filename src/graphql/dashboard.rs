// src/graphql/dashboard.rs

use async_graphql::{Context, Object};

use crate::dashboard::DashboardSummary;
use crate::error::GqlResultExt;

use super::{app_state, current_user};

#[derive(Default)]
pub struct DashboardQuery;

#[Object]
impl DashboardQuery {
    async fn dashboard_summary(&self, ctx: &Context<'_>) -> async_graphql::Result<DashboardSummary> {
        let user = current_user(ctx)?;
        app_state(ctx)?.dashboard.summary(&user.company_id).await.gql()
    }
}
