// src/graphql/impact.rs

use async_graphql::{Context, Object};

use crate::error::GqlResultExt;
use crate::impact::{CreateImpactRecordInput, ImpactRecord};

use super::{app_state, current_user};

#[derive(Default)]
pub struct ImpactQuery;

#[Object]
impl ImpactQuery {
    /// The caller's company records, newest period first
    async fn impact_records(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ImpactRecord>> {
        let user = current_user(ctx)?;
        app_state(ctx)?.impact.find_all_by_company(&user.company_id).await.gql()
    }

    async fn impact_record(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<ImpactRecord> {
        let user = current_user(ctx)?;
        app_state(ctx)?.impact.find_one(&id, user).await.gql()
    }
}

#[derive(Default)]
pub struct ImpactMutation;

#[Object]
impl ImpactMutation {
    async fn create_impact_record(
        &self,
        ctx: &Context<'_>,
        data: CreateImpactRecordInput,
    ) -> async_graphql::Result<ImpactRecord> {
        let user = current_user(ctx)?;
        app_state(ctx)?.impact.create(data, user).await.gql()
    }
}
