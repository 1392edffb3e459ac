// src/goals/models.rs

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

/// Yearly target for one metric of one company
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub company_id: String,
    pub metric_id: String,
    pub target: f64,
    pub year: i32,
    #[graphql(skip)]
    pub created_at: i64,
    #[graphql(skip)]
    pub updated_at: i64,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct UpsertGoalInput {
    pub metric_id: String,
    pub target: f64,
    pub year: i32,
}
