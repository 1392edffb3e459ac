// src/companies/models.rs

use async_graphql::SimpleObject;
use serde::Serialize;

/// A tenant
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub employees_count: i32,
    /// Set once onboarding has picked the tracked metrics
    pub is_configured: bool,
    #[graphql(skip)]
    pub created_at: i64,
    #[graphql(skip)]
    pub updated_at: i64,
}

/// Company as listed to anonymous callers on the sign-up form
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicCompany {
    pub id: String,
    pub name: String,
    pub sector: String,
}

/// Activation of a catalog metric for one company
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMetric {
    pub id: String,
    pub company_id: String,
    pub metric_id: String,
    pub is_active: bool,
}
