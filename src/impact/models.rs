// src/impact/models.rs

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

/// One company's reported consumption for a month
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRecord {
    pub id: String,
    pub company_id: String,
    pub created_by_id: String,
    pub month: i32,
    pub year: i32,
    /// kg CO2e, sum of the values' equivalents
    pub total_impact: f64,
    #[graphql(skip)]
    pub created_at: i64,
    #[graphql(skip)]
    pub updated_at: i64,
}

#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct ImpactValue {
    pub id: String,
    pub record_id: String,
    pub metric_id: String,
    pub amount: f64,
    pub co2_equivalent: f64,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct ImpactValueInput {
    pub metric_id: String,
    pub amount: f64,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct CreateImpactRecordInput {
    pub month: i32,
    pub year: i32,
    pub values: Vec<ImpactValueInput>,
}
