// src/graphql/users.rs

use async_graphql::{Context, Object};

use crate::auth::{MANAGERS, Role, UserStatus};
use crate::error::GqlResultExt;
use crate::users::User;

use super::{app_state, current_user, require_role};

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<User> {
        let user = current_user(ctx)?;
        app_state(ctx)?.users.find_one(&user.id).await.gql()
    }

    /// Every user on the platform
    async fn users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        require_role(ctx, &[Role::SuperAdmin])?;
        app_state(ctx)?.users.find_all().await.gql()
    }

    async fn users_by_company(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        let user = current_user(ctx)?;
        app_state(ctx)?.users.find_by_company(&user.company_id).await.gql()
    }

    async fn pending_users(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<User>> {
        let user = require_role(ctx, MANAGERS)?;
        app_state(ctx)?
            .users
            .find_pending_by_company(&user.company_id)
            .await
            .gql()
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn approve_user(&self, ctx: &Context<'_>, user_id: String) -> async_graphql::Result<User> {
        let manager = require_role(ctx, MANAGERS)?;
        app_state(ctx)?
            .users
            .update_status(&user_id, UserStatus::Active, manager)
            .await
            .gql()
    }

    async fn reject_user(&self, ctx: &Context<'_>, user_id: String) -> async_graphql::Result<User> {
        let manager = require_role(ctx, MANAGERS)?;
        app_state(ctx)?
            .users
            .update_status(&user_id, UserStatus::Rejected, manager)
            .await
            .gql()
    }
}
