// src/graphql/goals.rs

use async_graphql::{Context, Object};

use crate::auth::Role;
use crate::error::GqlResultExt;
use crate::goals::{Goal, UpsertGoalInput};

use super::{app_state, current_user, require_role};

#[derive(Default)]
pub struct GoalQuery;

#[Object]
impl GoalQuery {
    async fn my_company_goals(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<Goal>> {
        let user = current_user(ctx)?;
        app_state(ctx)?.goals.find_all_by_company(&user.company_id).await.gql()
    }
}

#[derive(Default)]
pub struct GoalMutation;

#[Object]
impl GoalMutation {
    /// Company managers only; super admins have no tenant goals
    async fn upsert_goal(&self, ctx: &Context<'_>, data: UpsertGoalInput) -> async_graphql::Result<Goal> {
        let user = require_role(ctx, &[Role::CompanyManager])?;
        app_state(ctx)?.goals.upsert(&user.company_id, data).await.gql()
    }

    async fn delete_goal(&self, ctx: &Context<'_>, id: String) -> async_graphql::Result<bool> {
        let user = require_role(ctx, &[Role::CompanyManager])?;
        app_state(ctx)?.goals.delete(&user.company_id, &id).await.gql()
    }
}
