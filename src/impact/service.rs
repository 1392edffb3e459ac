// src/impact/service.rs

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::{new_id, now};
use crate::error::{AppError, AppResult, is_unique_violation};
use crate::goals::service::{MAX_YEAR, MIN_YEAR};
use crate::metrics::catalog_for_company;

use super::emissions::calculate;
use super::models::{CreateImpactRecordInput, ImpactRecord, ImpactValue};

const RECORD_COLUMNS: &str = "id, company_id, created_by_id, month, year, total_impact, created_at, updated_at";

pub struct ImpactService {
    db: SqlitePool,
}

impl ImpactService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Store a month of values for the caller's company
    pub async fn create(&self, input: CreateImpactRecordInput, author: &CurrentUser) -> AppResult<ImpactRecord> {
        if !(1..=12).contains(&input.month) {
            return Err(AppError::invalid_input("Month must be between 1 and 12"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&input.year) {
            return Err(AppError::invalid_input(format!(
                "Year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            )));
        }

        let company_id = author.company_id.as_str();
        let mut tx = self.db.begin().await?;

        let factors: HashMap<String, f64> = catalog_for_company(&mut *tx, company_id)
            .await?
            .into_iter()
            .map(|m| (m.id, m.emission_factor))
            .collect();

        let (emissions, total) = calculate(&input.values, &factors)?;

        let record_id = new_id();
        let ts = now();

        sqlx::query(
            r#"
            INSERT INTO impact_records (id, company_id, created_by_id, month, year, total_impact, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record_id)
        .bind(company_id)
        .bind(&author.id)
        .bind(input.month)
        .bind(input.year)
        .bind(total)
        .bind(ts)
        .bind(ts)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(format!(
                    "An impact record already exists for period {}/{}.",
                    input.month, input.year
                ))
            } else {
                AppError::from(e)
            }
        })?;

        for emission in &emissions {
            sqlx::query(
                r#"
                INSERT INTO impact_values (id, record_id, metric_id, amount, co2_equivalent)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(new_id())
            .bind(&record_id)
            .bind(&emission.metric_id)
            .bind(emission.amount)
            .bind(emission.co2_equivalent)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Stored impact record {}/{} for company {}: {:.2} kg CO2e",
            input.month, input.year, company_id, total
        );

        self.get(&record_id).await
    }

    /// Records of a company, newest period first
    pub async fn find_all_by_company(&self, company_id: &str) -> AppResult<Vec<ImpactRecord>> {
        let records = sqlx::query_as::<_, ImpactRecord>(&format!(
            "SELECT {} FROM impact_records WHERE company_id = ? ORDER BY year DESC, month DESC",
            RECORD_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    /// A record of the viewer's company. Unknown ids and other tenants'
    /// records are indistinguishable to the caller.
    pub async fn find_one(&self, id: &str, viewer: &CurrentUser) -> AppResult<ImpactRecord> {
        match self.find_by_id(id).await? {
            Some(record) if record.company_id == viewer.company_id => Ok(record),
            _ => Err(AppError::forbidden("Access denied")),
        }
    }

    pub async fn values_for_record(&self, record_id: &str) -> AppResult<Vec<ImpactValue>> {
        let values = sqlx::query_as::<_, ImpactValue>(
            r#"
            SELECT id, record_id, metric_id, amount, co2_equivalent
            FROM impact_values
            WHERE record_id = ?
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.db)
        .await?;

        Ok(values)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<ImpactRecord>> {
        let record = sqlx::query_as::<_, ImpactRecord>(&format!(
            "SELECT {} FROM impact_records WHERE id = ?",
            RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(record)
    }

    async fn get(&self, id: &str) -> AppResult<ImpactRecord> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Impact record not found"))
    }
}
