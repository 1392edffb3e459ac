// src/goals/service.rs

use sqlx::SqlitePool;
use tracing::info;

use crate::db::{new_id, now};
use crate::error::{AppError, AppResult};
use crate::metrics::catalog_for_company;

use super::models::{Goal, UpsertGoalInput};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

const GOAL_COLUMNS: &str = "id, company_id, metric_id, target, year, created_at, updated_at";

pub struct GoalService {
    db: SqlitePool,
}

impl GoalService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_all_by_company(&self, company_id: &str) -> AppResult<Vec<Goal>> {
        let goals = sqlx::query_as::<_, Goal>(&format!(
            "SELECT {} FROM goals WHERE company_id = ? ORDER BY year DESC, created_at",
            GOAL_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(goals)
    }

    /// Create the goal, or replace the target of the existing one for that metric and year
    pub async fn upsert(&self, company_id: &str, input: UpsertGoalInput) -> AppResult<Goal> {
        if !input.target.is_finite() || input.target < 0.0 {
            return Err(AppError::invalid_input("Target must be a non-negative number"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&input.year) {
            return Err(AppError::invalid_input(format!(
                "Year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            )));
        }

        let visible = catalog_for_company(&self.db, company_id)
            .await?
            .iter()
            .any(|m| m.id == input.metric_id);
        if !visible {
            return Err(AppError::not_found("Metric not found"));
        }

        let ts = now();
        sqlx::query(
            r#"
            INSERT INTO goals (id, company_id, metric_id, target, year, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(company_id, metric_id, year) DO UPDATE SET
                target = excluded.target,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(new_id())
        .bind(company_id)
        .bind(&input.metric_id)
        .bind(input.target)
        .bind(input.year)
        .bind(ts)
        .bind(ts)
        .execute(&self.db)
        .await?;

        info!(
            "Goal for metric {} in {} set to {} (company {})",
            input.metric_id, input.year, input.target, company_id
        );

        sqlx::query_as::<_, Goal>(&format!(
            "SELECT {} FROM goals WHERE company_id = ? AND metric_id = ? AND year = ?",
            GOAL_COLUMNS
        ))
        .bind(company_id)
        .bind(&input.metric_id)
        .bind(input.year)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("Goal not found"))
    }

    /// Delete a goal owned by the company; other tenants' goals read as missing
    pub async fn delete(&self, company_id: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Goal not found"));
        }

        info!("Deleted goal {} (company {})", id, company_id);
        Ok(true)
    }
}
