// src/graphql/ai.rs

use async_graphql::{Context, Object};

use crate::ai::{ChatMessageInput, MetricSuggestion};
use crate::error::GqlResultExt;

use super::{app_state, current_user};

#[derive(Default)]
pub struct AiQuery;

#[Object]
impl AiQuery {
    /// Assistant reply to the conversation, grounded on the dashboard context
    async fn get_ai_insight(
        &self,
        ctx: &Context<'_>,
        history: Vec<ChatMessageInput>,
        context: String,
    ) -> async_graphql::Result<String> {
        current_user(ctx)?;
        app_state(ctx)?.ai.contextual_insight(&history, &context).await.gql()
    }

    async fn suggest_metric_details(
        &self,
        ctx: &Context<'_>,
        metric_name: String,
    ) -> async_graphql::Result<MetricSuggestion> {
        current_user(ctx)?;
        app_state(ctx)?.ai.suggest_metric_details(&metric_name).await.gql()
    }
}
