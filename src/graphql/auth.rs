// src/graphql/auth.rs

use async_graphql::{Context, Object};

use crate::auth::{AuthPayload, LoginInput, RegisterCompanyInput, RegisterInput};
use crate::error::GqlResultExt;

use super::app_state;

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    async fn login(&self, ctx: &Context<'_>, data: LoginInput) -> async_graphql::Result<AuthPayload> {
        app_state(ctx)?.auth.login(data).await.gql()
    }

    /// Ask to join an existing company
    async fn register(&self, ctx: &Context<'_>, data: RegisterInput) -> async_graphql::Result<AuthPayload> {
        app_state(ctx)?.auth.register(data).await.gql()
    }

    /// Create a company together with its first manager
    async fn register_company(
        &self,
        ctx: &Context<'_>,
        data: RegisterCompanyInput,
    ) -> async_graphql::Result<AuthPayload> {
        app_state(ctx)?.auth.register_company(data).await.gql()
    }
}
