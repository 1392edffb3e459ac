// src/graphql/metrics.rs

use async_graphql::{Context, Object};

use crate::auth::{MANAGERS, Role};
use crate::error::GqlResultExt;
use crate::metrics::{CreateMetricInput, Metric, MetricRequest, MetricRequestStatus};

use super::{app_state, current_user, require_role};

#[derive(Default)]
pub struct MetricQuery;

#[Object]
impl MetricQuery {
    /// Active metrics available to the caller's company
    async fn metrics(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Metric>> {
        let user = current_user(ctx)?;
        app_state(ctx)?.metrics.find_all(&user.company_id).await.gql()
    }

    async fn metric(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<Metric> {
        let user = current_user(ctx)?;
        app_state(ctx)?
            .metrics
            .find_visible(&id, &user.company_id)
            .await
            .gql()
    }

    async fn metric_requests(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<MetricRequest>> {
        let user = require_role(ctx, MANAGERS)?;
        app_state(ctx)?.metrics.list_requests(user).await.gql()
    }
}

#[derive(Default)]
pub struct MetricMutation;

#[Object]
impl MetricMutation {
    async fn create_metric(
        &self,
        ctx: &Context<'_>,
        create_metric_input: CreateMetricInput,
    ) -> async_graphql::Result<Metric> {
        let user = require_role(ctx, MANAGERS)?;
        app_state(ctx)?.metrics.create(create_metric_input, user).await.gql()
    }

    /// Ask the platform to add a metric to the global catalog
    async fn request_metric(&self, ctx: &Context<'_>, description: String) -> async_graphql::Result<MetricRequest> {
        let user = require_role(ctx, &[Role::CompanyManager])?;
        app_state(ctx)?
            .metrics
            .request_metric(&user.company_id, &description)
            .await
            .gql()
    }

    async fn review_metric_request(
        &self,
        ctx: &Context<'_>,
        id: String,
        status: MetricRequestStatus,
        admin_note: Option<String>,
    ) -> async_graphql::Result<MetricRequest> {
        require_role(ctx, &[Role::SuperAdmin])?;
        app_state(ctx)?
            .metrics
            .review_request(&id, status, admin_note)
            .await
            .gql()
    }
}
