// src/companies/service.rs

use std::collections::HashSet;

use sqlx::SqlitePool;
use tracing::info;

use crate::db::{new_id, now};
use crate::error::{AppError, AppResult};
use crate::metrics::catalog_for_company;

use super::models::{Company, CompanyMetric, PublicCompany};

const COMPANY_COLUMNS: &str = "id, name, sector, employees_count, is_configured, created_at, updated_at";

pub struct CompanyService {
    db: SqlitePool,
}

impl CompanyService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> AppResult<Vec<PublicCompany>> {
        let companies = sqlx::query_as::<_, PublicCompany>("SELECT id, name, sector FROM companies ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(companies)
    }

    pub async fn find_one(&self, id: &str) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(&format!("SELECT {} FROM companies WHERE id = ?", COMPANY_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found"))
    }

    pub async fn company_metrics(&self, company_id: &str) -> AppResult<Vec<CompanyMetric>> {
        let rows = sqlx::query_as::<_, CompanyMetric>(
            r#"
            SELECT id, company_id, metric_id, is_active
            FROM company_metrics
            WHERE company_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Activate the chosen metrics and mark the company configured
    pub async fn complete_onboarding(&self, company_id: &str, metric_ids: &[String]) -> AppResult<Company> {
        let mut tx = self.db.begin().await?;

        let visible: HashSet<String> = catalog_for_company(&mut *tx, company_id)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if let Some(unknown) = metric_ids.iter().find(|id| !visible.contains(*id)) {
            return Err(AppError::invalid_input(format!("Unknown metric: {}", unknown)));
        }

        let ts = now();
        for metric_id in metric_ids {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO company_metrics (id, company_id, metric_id, is_active, created_at)
                VALUES (?, ?, ?, TRUE, ?)
                "#,
            )
            .bind(new_id())
            .bind(company_id)
            .bind(metric_id)
            .bind(ts)
            .execute(&mut *tx)
            .await?;
        }

        let result = sqlx::query("UPDATE companies SET is_configured = TRUE, updated_at = ? WHERE id = ?")
            .bind(ts)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Company not found"));
        }

        tx.commit().await?;

        info!("Company {} completed onboarding with {} metrics", company_id, metric_ids.len());
        self.find_one(company_id).await
    }

    /// Flip a metric's activation for the company, creating it active when absent
    pub async fn toggle_metric(&self, company_id: &str, metric_id: &str) -> AppResult<CompanyMetric> {
        let mut tx = self.db.begin().await?;

        let existing: Option<(String, bool)> =
            sqlx::query_as("SELECT id, is_active FROM company_metrics WHERE company_id = ? AND metric_id = ?")
                .bind(company_id)
                .bind(metric_id)
                .fetch_optional(&mut *tx)
                .await?;

        let id = match existing {
            Some((id, is_active)) => {
                sqlx::query("UPDATE company_metrics SET is_active = ? WHERE id = ?")
                    .bind(!is_active)
                    .bind(&id)
                    .execute(&mut *tx)
                    .await?;
                id
            }
            None => {
                let visible = catalog_for_company(&mut *tx, company_id)
                    .await?
                    .iter()
                    .any(|m| m.id == metric_id);
                if !visible {
                    return Err(AppError::not_found("Metric not found"));
                }

                let id = new_id();
                sqlx::query(
                    r#"
                    INSERT INTO company_metrics (id, company_id, metric_id, is_active, created_at)
                    VALUES (?, ?, ?, TRUE, ?)
                    "#,
                )
                .bind(&id)
                .bind(company_id)
                .bind(metric_id)
                .bind(now())
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        let row = sqlx::query_as::<_, CompanyMetric>(
            "SELECT id, company_id, metric_id, is_active FROM company_metrics WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Metric {} active={} for company {}", metric_id, row.is_active, company_id);
        Ok(row)
    }
}
