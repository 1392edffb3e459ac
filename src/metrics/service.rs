// src/metrics/service.rs

use sqlx::{SqliteExecutor, SqlitePool};
use tracing::info;

use crate::auth::{CurrentUser, Role};
use crate::db::{new_id, now};
use crate::error::{AppError, AppResult};

use super::models::{CreateMetricInput, Metric, MetricRequest, MetricRequestStatus};
use super::seed::DEFAULT_METRICS;

pub(crate) const METRIC_COLUMNS: &str =
    "id, name, unit, description, icon, color, emission_factor, is_active, company_id";

const REQUEST_COLUMNS: &str = "id, company_id, description, status, admin_note, created_at, updated_at";

/// Active metrics a company may use: the global catalog plus its own
pub async fn catalog_for_company<'e>(executor: impl SqliteExecutor<'e>, company_id: &str) -> AppResult<Vec<Metric>> {
    let metrics = sqlx::query_as::<_, Metric>(&format!(
        r#"
        SELECT {}
        FROM metrics
        WHERE is_active = TRUE AND (company_id IS NULL OR company_id = ?)
        ORDER BY company_id IS NOT NULL, created_at, name
        "#,
        METRIC_COLUMNS
    ))
    .bind(company_id)
    .fetch_all(executor)
    .await?;

    Ok(metrics)
}

pub struct MetricService {
    db: SqlitePool,
}

impl MetricService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Insert the default catalog, renaming legacy English rows in place
    pub async fn seed_default_metrics(&self) -> AppResult<usize> {
        info!("Checking default metrics...");
        let mut changed = 0;

        for m in DEFAULT_METRICS {
            let existing: Option<(String, String, Option<String>)> = sqlx::query_as(
                r#"
                SELECT id, name, description FROM metrics
                WHERE company_id IS NULL AND (name = ? OR name = ?)
                ORDER BY name = ? DESC
                LIMIT 1
                "#,
            )
            .bind(m.name)
            .bind(m.legacy_name)
            .bind(m.name)
            .fetch_optional(&self.db)
            .await?;

            let ts = now();
            match existing {
                None => {
                    sqlx::query(
                        r#"
                        INSERT INTO metrics (id, name, unit, description, icon, color, emission_factor, is_active, company_id, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, NULL, ?, ?)
                        "#,
                    )
                    .bind(new_id())
                    .bind(m.name)
                    .bind(m.unit)
                    .bind(m.description)
                    .bind(m.icon)
                    .bind(m.color)
                    .bind(m.emission_factor)
                    .bind(ts)
                    .bind(ts)
                    .execute(&self.db)
                    .await?;

                    info!("Seeded default metric: {}", m.name);
                    changed += 1;
                }
                Some((id, name, description)) if name != m.name || description.is_none() => {
                    sqlx::query(
                        r#"
                        UPDATE metrics
                        SET name = ?, unit = ?, description = ?, icon = ?, color = ?, emission_factor = ?, updated_at = ?
                        WHERE id = ?
                        "#,
                    )
                    .bind(m.name)
                    .bind(m.unit)
                    .bind(m.description)
                    .bind(m.icon)
                    .bind(m.color)
                    .bind(m.emission_factor)
                    .bind(ts)
                    .bind(&id)
                    .execute(&self.db)
                    .await?;

                    info!("Updated default metric: {}", m.name);
                    changed += 1;
                }
                Some(_) => {}
            }
        }

        Ok(changed)
    }

    pub async fn find_all(&self, company_id: &str) -> AppResult<Vec<Metric>> {
        catalog_for_company(&self.db, company_id).await
    }

    /// Any metric by id, active or not
    pub async fn find_by_id(&self, id: &str) -> AppResult<Metric> {
        sqlx::query_as::<_, Metric>(&format!("SELECT {} FROM metrics WHERE id = ?", METRIC_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Metric not found"))
    }

    /// A metric the company is allowed to see
    pub async fn find_visible(&self, id: &str, company_id: &str) -> AppResult<Metric> {
        let metric = self.find_by_id(id).await?;
        match &metric.company_id {
            Some(owner) if owner != company_id => Err(AppError::not_found("Metric not found")),
            _ => Ok(metric),
        }
    }

    pub async fn create(&self, mut input: CreateMetricInput, viewer: &CurrentUser) -> AppResult<Metric> {
        if viewer.role == Role::CompanyManager {
            input.company_id = Some(viewer.company_id.clone());
        }

        let name = input.name.trim().to_string();
        let unit = input.unit.trim().to_string();
        if name.is_empty() || unit.is_empty() {
            return Err(AppError::invalid_input("Metric name and unit are required"));
        }
        if !input.emission_factor.is_finite() || input.emission_factor < 0.0 {
            return Err(AppError::invalid_input("Emission factor must be a non-negative number"));
        }

        let metric_id = new_id();
        let ts = now();
        let mut tx = self.db.begin().await?;

        if let Some(company_id) = &input.company_id {
            let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies WHERE id = ?")
                .bind(company_id)
                .fetch_one(&mut *tx)
                .await?;
            if exists.0 == 0 {
                return Err(AppError::not_found("Company not found"));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO metrics (id, name, unit, description, icon, color, emission_factor, is_active, company_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, TRUE, ?, ?, ?)
            "#,
        )
        .bind(&metric_id)
        .bind(&name)
        .bind(&unit)
        .bind(&input.description)
        .bind(&input.icon)
        .bind(&input.color)
        .bind(input.emission_factor)
        .bind(&input.company_id)
        .bind(ts)
        .bind(ts)
        .execute(&mut *tx)
        .await?;

        if let Some(company_id) = &input.company_id {
            sqlx::query(
                r#"
                INSERT INTO company_metrics (id, company_id, metric_id, is_active, created_at)
                VALUES (?, ?, ?, TRUE, ?)
                "#,
            )
            .bind(new_id())
            .bind(company_id)
            .bind(&metric_id)
            .bind(ts)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Created metric {} ({})", name, metric_id);
        self.find_by_id(&metric_id).await
    }

    pub async fn request_metric(&self, company_id: &str, description: &str) -> AppResult<MetricRequest> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::invalid_input("Describe the metric you need"));
        }

        let id = new_id();
        let ts = now();
        sqlx::query(
            r#"
            INSERT INTO metric_requests (id, company_id, description, status, admin_note, created_at, updated_at)
            VALUES (?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(company_id)
        .bind(description)
        .bind(MetricRequestStatus::Pending.as_str())
        .bind(ts)
        .bind(ts)
        .execute(&self.db)
        .await?;

        info!("Company {} requested a new metric", company_id);
        self.find_request(&id).await
    }

    /// Super admins see every request, everyone else only their company's
    pub async fn list_requests(&self, viewer: &CurrentUser) -> AppResult<Vec<MetricRequest>> {
        let requests = if viewer.is_super_admin() {
            sqlx::query_as::<_, MetricRequest>(&format!(
                "SELECT {} FROM metric_requests ORDER BY created_at DESC",
                REQUEST_COLUMNS
            ))
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, MetricRequest>(&format!(
                "SELECT {} FROM metric_requests WHERE company_id = ? ORDER BY created_at DESC",
                REQUEST_COLUMNS
            ))
            .bind(&viewer.company_id)
            .fetch_all(&self.db)
            .await?
        };

        Ok(requests)
    }

    pub async fn review_request(
        &self,
        id: &str,
        status: MetricRequestStatus,
        admin_note: Option<String>,
    ) -> AppResult<MetricRequest> {
        if status == MetricRequestStatus::Pending {
            return Err(AppError::invalid_input("A review must approve or reject the request"));
        }

        let result = sqlx::query(
            "UPDATE metric_requests SET status = ?, admin_note = ?, updated_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(admin_note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()))
        .bind(now())
        .bind(id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Metric request not found"));
        }

        info!("Metric request {} marked {}", id, status.as_str());
        self.find_request(id).await
    }

    async fn find_request(&self, id: &str) -> AppResult<MetricRequest> {
        sqlx::query_as::<_, MetricRequest>(&format!(
            "SELECT {} FROM metric_requests WHERE id = ?",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Metric request not found"))
    }
}
