// src/graphql/objects.rs
// Relation and timestamp fields resolved on demand

use async_graphql::{ComplexObject, Context, ErrorExtensions};
use chrono::{DateTime, Utc};

use crate::companies::{Company, CompanyMetric};
use crate::error::{AppError, GqlResultExt};
use crate::goals::Goal;
use crate::impact::{ImpactRecord, ImpactValue};
use crate::metrics::{Metric, MetricRequest};
use crate::users::User;

use super::{app_state, current_user, timestamp};

#[ComplexObject]
impl User {
    async fn company(&self, ctx: &Context<'_>) -> async_graphql::Result<Company> {
        app_state(ctx)?.companies.find_one(&self.company_id).await.gql()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        timestamp(self.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        timestamp(self.updated_at)
    }
}

#[ComplexObject]
impl Company {
    /// Visible to the company's own users and to super admins
    async fn company_metrics(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CompanyMetric>> {
        let user = current_user(ctx)?;
        if !user.is_super_admin() && user.company_id != self.id {
            return Err(AppError::forbidden("Access denied").extend());
        }
        app_state(ctx)?.companies.company_metrics(&self.id).await.gql()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        timestamp(self.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        timestamp(self.updated_at)
    }
}

#[ComplexObject]
impl CompanyMetric {
    async fn metric(&self, ctx: &Context<'_>) -> async_graphql::Result<Metric> {
        app_state(ctx)?
            .metrics
            .find_visible(&self.metric_id, &self.company_id)
            .await
            .gql()
    }
}

#[ComplexObject]
impl MetricRequest {
    async fn company(&self, ctx: &Context<'_>) -> async_graphql::Result<Company> {
        app_state(ctx)?.companies.find_one(&self.company_id).await.gql()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        timestamp(self.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        timestamp(self.updated_at)
    }
}

#[ComplexObject]
impl Goal {
    async fn metric(&self, ctx: &Context<'_>) -> async_graphql::Result<Metric> {
        app_state(ctx)?.metrics.find_by_id(&self.metric_id).await.gql()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        timestamp(self.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        timestamp(self.updated_at)
    }
}

#[ComplexObject]
impl ImpactRecord {
    async fn values(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ImpactValue>> {
        app_state(ctx)?.impact.values_for_record(&self.id).await.gql()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        timestamp(self.created_at)
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        timestamp(self.updated_at)
    }
}

#[ComplexObject]
impl ImpactValue {
    async fn metric(&self, ctx: &Context<'_>) -> async_graphql::Result<Metric> {
        app_state(ctx)?.metrics.find_by_id(&self.metric_id).await.gql()
    }
}
