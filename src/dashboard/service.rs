// src/dashboard/service.rs

use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};

use super::models::{DashboardSummary, MetricInsight, Period};
use super::trends::{goal_met, impact_score, per_capita, trend_percent};

#[derive(sqlx::FromRow)]
struct TrackedMetric {
    id: String,
    name: String,
    unit: String,
    icon: String,
    color: String,
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    month: i32,
    year: i32,
    total_impact: f64,
}

/// Amounts and equivalents of one record keyed by metric id
struct RecordValues {
    amounts: HashMap<String, (f64, f64)>,
}

impl RecordValues {
    fn amount(&self, metric_id: &str) -> f64 {
        self.amounts.get(metric_id).map(|v| v.0).unwrap_or(0.0)
    }

    fn co2(&self, metric_id: &str) -> f64 {
        self.amounts.get(metric_id).map(|v| v.1).unwrap_or(0.0)
    }
}

pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn summary(&self, company_id: &str) -> AppResult<DashboardSummary> {
        let company: (bool, i32) =
            sqlx::query_as("SELECT is_configured, employees_count FROM companies WHERE id = ?")
                .bind(company_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::not_found("Company not found"))?;
        let (is_configured, employees_count) = company;

        let record_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM impact_records WHERE company_id = ?")
            .bind(company_id)
            .fetch_one(&self.db)
            .await?;

        let recent = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, month, year, total_impact
            FROM impact_records
            WHERE company_id = ?
            ORDER BY year DESC, month DESC
            LIMIT 2
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        let latest = recent.first();
        let previous = recent.get(1);

        let latest_values = match latest {
            Some(r) => Some(self.record_values(&r.id).await?),
            None => None,
        };
        let previous_values = match previous {
            Some(r) => Some(self.record_values(&r.id).await?),
            None => None,
        };

        let goals: HashMap<String, f64> = match latest {
            Some(r) => sqlx::query_as::<_, (String, f64)>(
                "SELECT metric_id, target FROM goals WHERE company_id = ? AND year = ?",
            )
            .bind(company_id)
            .bind(r.year)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .collect(),
            None => HashMap::new(),
        };

        let tracked = sqlx::query_as::<_, TrackedMetric>(
            r#"
            SELECT m.id, m.name, m.unit, m.icon, m.color
            FROM company_metrics cm
            JOIN metrics m ON m.id = cm.metric_id
            WHERE cm.company_id = ? AND cm.is_active = TRUE AND m.is_active = TRUE
            ORDER BY cm.created_at, m.name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        let metrics = tracked
            .into_iter()
            .map(|m| {
                let value = latest_values.as_ref().map(|v| v.amount(&m.id)).unwrap_or(0.0);
                let co2_equivalent = latest_values.as_ref().map(|v| v.co2(&m.id)).unwrap_or(0.0);
                let previous_value = previous_values.as_ref().map(|v| v.amount(&m.id));
                let trend = trend_percent(value, previous_value);
                let goal_target = goals.get(&m.id).copied();

                MetricInsight {
                    metric_id: m.id,
                    name: m.name,
                    unit: m.unit,
                    icon: m.icon,
                    color: m.color,
                    value,
                    previous_value,
                    co2_equivalent,
                    trend_percent: trend,
                    is_improving: trend <= 0.0,
                    per_capita: per_capita(value, employees_count),
                    goal_target,
                    goal_met: goal_met(value, goal_target),
                }
            })
            .collect();

        let total_impact = latest.map(|r| r.total_impact).unwrap_or(0.0);

        Ok(DashboardSummary {
            is_configured,
            employees_count,
            record_count: record_count.0,
            latest_period: latest.map(period),
            previous_period: previous.map(period),
            total_impact,
            total_impact_trend: trend_percent(total_impact, previous.map(|r| r.total_impact)),
            impact_score: impact_score(total_impact),
            metrics,
        })
    }

    async fn record_values(&self, record_id: &str) -> AppResult<RecordValues> {
        let rows: Vec<(String, f64, f64)> =
            sqlx::query_as("SELECT metric_id, amount, co2_equivalent FROM impact_values WHERE record_id = ?")
                .bind(record_id)
                .fetch_all(&self.db)
                .await?;

        Ok(RecordValues {
            amounts: rows.into_iter().map(|(id, amount, co2)| (id, (amount, co2))).collect(),
        })
    }
}

fn period(record: &RecordRow) -> Period {
    Period {
        month: record.month,
        year: record.year,
    }
}
