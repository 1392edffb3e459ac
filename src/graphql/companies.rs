// src/graphql/companies.rs

use async_graphql::{Context, Object};

use crate::auth::MANAGERS;
use crate::companies::{Company, CompanyMetric, PublicCompany};
use crate::error::GqlResultExt;

use super::{app_state, current_user, require_role};

#[derive(Default)]
pub struct CompanyQuery;

#[Object]
impl CompanyQuery {
    /// Every company, for the sign-up form. Only public fields.
    async fn companies(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<PublicCompany>> {
        app_state(ctx)?.companies.find_all().await.gql()
    }

    async fn my_company(&self, ctx: &Context<'_>) -> async_graphql::Result<Company> {
        let user = current_user(ctx)?;
        app_state(ctx)?.companies.find_one(&user.company_id).await.gql()
    }
}

#[derive(Default)]
pub struct CompanyMutation;

#[Object]
impl CompanyMutation {
    async fn complete_onboarding(&self, ctx: &Context<'_>, metric_ids: Vec<String>) -> async_graphql::Result<Company> {
        let user = require_role(ctx, MANAGERS)?;
        app_state(ctx)?
            .companies
            .complete_onboarding(&user.company_id, &metric_ids)
            .await
            .gql()
    }

    async fn toggle_metric(&self, ctx: &Context<'_>, metric_id: String) -> async_graphql::Result<CompanyMetric> {
        let user = require_role(ctx, MANAGERS)?;
        app_state(ctx)?
            .companies
            .toggle_metric(&user.company_id, &metric_id)
            .await
            .gql()
    }
}
