// src/users/service.rs

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::{CurrentUser, UserStatus};
use crate::db::now;
use crate::error::{AppError, AppResult};

use super::models::User;

const USER_COLUMNS: &str = "id, name, email, role, status, company_id, created_at, updated_at";

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn find_one(&self, id: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn find_by_company(&self, company_id: &str) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE company_id = ? ORDER BY created_at",
            USER_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn find_pending_by_company(&self, company_id: &str) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE company_id = ? AND status = ? ORDER BY created_at",
            USER_COLUMNS
        ))
        .bind(company_id)
        .bind(UserStatus::Pending.as_str())
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Approve or reject a user. Managers only act inside their own company.
    pub async fn update_status(&self, user_id: &str, status: UserStatus, manager: &CurrentUser) -> AppResult<User> {
        let target = self.find_one(user_id).await?;

        if target.company_id != manager.company_id && !manager.is_super_admin() {
            return Err(AppError::forbidden(
                "You can only manage users within your own company",
            ));
        }

        if target.id == manager.id {
            return Err(AppError::forbidden("You cannot change your own status"));
        }

        sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(now())
            .bind(user_id)
            .execute(&self.db)
            .await?;

        info!("User {} set to {} by {}", user_id, status.as_str(), manager.id);

        self.find_one(user_id).await
    }
}
