// src/dashboard/models.rs

use async_graphql::SimpleObject;
use serde::Serialize;

#[derive(SimpleObject, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub month: i32,
    pub year: i32,
}

/// One tracked metric compared across the two latest periods
#[derive(SimpleObject, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInsight {
    pub metric_id: String,
    pub name: String,
    pub unit: String,
    pub icon: String,
    pub color: String,
    pub value: f64,
    pub previous_value: Option<f64>,
    pub co2_equivalent: f64,
    pub trend_percent: f64,
    pub is_improving: bool,
    pub per_capita: f64,
    pub goal_target: Option<f64>,
    pub goal_met: Option<bool>,
}

#[derive(SimpleObject, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub is_configured: bool,
    pub employees_count: i32,
    pub record_count: i64,
    pub latest_period: Option<Period>,
    pub previous_period: Option<Period>,
    pub total_impact: f64,
    pub total_impact_trend: f64,
    pub impact_score: f64,
    pub metrics: Vec<MetricInsight>,
}
