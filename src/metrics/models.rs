// src/metrics/models.rs

use async_graphql::{Enum, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// A catalog metric: global when `company_id` is empty, otherwise private to one company
#[derive(SimpleObject, Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    /// kg CO2e per unit
    pub emission_factor: f64,
    pub is_active: bool,
    pub company_id: Option<String>,
}

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl MetricRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricRequestStatus::Pending => "PENDING",
            MetricRequestStatus::Approved => "APPROVED",
            MetricRequestStatus::Rejected => "REJECTED",
        }
    }
}

impl TryFrom<String> for MetricRequestStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(MetricRequestStatus::Pending),
            "APPROVED" => Ok(MetricRequestStatus::Approved),
            "REJECTED" => Ok(MetricRequestStatus::Rejected),
            _ => Err(UnknownVariant { kind: "metric request status", value }),
        }
    }
}

/// A company asking the platform to add a metric to the catalog
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct MetricRequest {
    pub id: String,
    pub company_id: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: MetricRequestStatus,
    pub admin_note: Option<String>,
    #[graphql(skip)]
    pub created_at: i64,
    #[graphql(skip)]
    pub updated_at: i64,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct CreateMetricInput {
    pub name: String,
    pub unit: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub emission_factor: f64,
    /// Owning company; forced to the caller's company for managers
    pub company_id: Option<String>,
}
