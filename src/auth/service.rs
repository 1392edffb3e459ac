// src/auth/service.rs

use sqlx::SqlitePool;
use tracing::info;

use crate::db::{new_id, now};
use crate::error::{AppError, AppResult, is_unique_violation};

use super::jwt::JwtManager;
use super::models::{
    AuthPayload, LoginInput, RegisterCompanyInput, RegisterInput, Role, UserCredentials, UserPayload,
    UserStatus,
};
use super::password::{hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 8;
const EMAIL_TAKEN: &str = "Email already in use";

pub struct AuthService {
    db: SqlitePool,
    jwt: JwtManager,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(db: SqlitePool, jwt: JwtManager, bcrypt_cost: u32) -> Self {
        Self { db, jwt, bcrypt_cost }
    }

    /// Create a company and its first manager in one transaction
    pub async fn register_company(&self, input: RegisterCompanyInput) -> AppResult<AuthPayload> {
        let company_name = require_text("Company name", &input.company.name)?;
        let sector = require_text("Sector", &input.company.sector)?;
        if input.company.employees_count < 0 {
            return Err(AppError::invalid_input("Employees count cannot be negative"));
        }

        let admin_name = require_text("Name", &input.admin.name)?;
        let email = normalize_email(&input.admin.email)?;
        validate_password(&input.admin.password)?;

        if self.email_exists(&email).await? {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&input.admin.password, self.bcrypt_cost)?;
        let company_id = new_id();
        let user_id = new_id();
        let ts = now();

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO companies (id, name, sector, employees_count, is_configured, created_at, updated_at)
            VALUES (?, ?, ?, ?, FALSE, ?, ?)
            "#,
        )
        .bind(&company_id)
        .bind(&company_name)
        .bind(&sector)
        .bind(input.company.employees_count)
        .bind(ts)
        .bind(ts)
        .execute(&mut *tx)
        .await?;

        insert_user(
            &mut tx,
            NewUser {
                id: &user_id,
                name: &admin_name,
                email: &email,
                password_hash: &password_hash,
                role: Role::CompanyManager,
                status: UserStatus::Active,
                company_id: &company_id,
                ts,
            },
        )
        .await?;

        tx.commit().await?;

        info!("Registered company {} ({})", company_name, company_id);

        let user = self.get_user_by_id(&user_id).await?;
        self.sign(&user)
    }

    /// Request access to an existing company; the account starts pending
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthPayload> {
        let name = require_text("Name", &input.name)?;
        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;

        if !self.company_exists(&input.company_id).await? {
            return Err(AppError::not_found("Company not found"));
        }

        if self.email_exists(&email).await? {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let user_id = new_id();

        let mut tx = self.db.begin().await?;
        insert_user(
            &mut tx,
            NewUser {
                id: &user_id,
                name: &name,
                email: &email,
                password_hash: &password_hash,
                role: Role::User,
                status: UserStatus::Pending,
                company_id: &input.company_id,
                ts: now(),
            },
        )
        .await?;
        tx.commit().await?;

        info!("User {} requested access to company {}", user_id, input.company_id);

        let user = self.get_user_by_id(&user_id).await?;
        self.sign(&user)
    }

    pub async fn login(&self, input: LoginInput) -> AppResult<AuthPayload> {
        let email = input.email.trim().to_lowercase();

        let user = self
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::InvalidCredentials("Invalid credentials".to_string()))?;

        if user.status == UserStatus::Rejected {
            return Err(AppError::forbidden("Your access request has been rejected"));
        }

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::InvalidCredentials("Invalid credentials".to_string()));
        }

        self.sign(&user)
    }

    /// Bootstrap a platform administrator, used from the CLI
    pub async fn create_super_admin(&self, name: &str, email: &str, password: &str) -> AppResult<UserPayload> {
        let name = require_text("Name", name)?;
        let email = normalize_email(email)?;
        validate_password(password)?;

        if self.email_exists(&email).await? {
            return Err(AppError::conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let ts = now();
        let mut tx = self.db.begin().await?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM companies WHERE sector = 'platform' ORDER BY created_at LIMIT 1")
                .fetch_optional(&mut *tx)
                .await?;

        let company_id = match existing {
            Some((id,)) => id,
            None => {
                let id = new_id();
                sqlx::query(
                    r#"
                    INSERT INTO companies (id, name, sector, employees_count, is_configured, created_at, updated_at)
                    VALUES (?, 'Platform Administration', 'platform', 0, TRUE, ?, ?)
                    "#,
                )
                .bind(&id)
                .bind(ts)
                .bind(ts)
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        let user_id = new_id();
        insert_user(
            &mut tx,
            NewUser {
                id: &user_id,
                name: &name,
                email: &email,
                password_hash: &password_hash,
                role: Role::SuperAdmin,
                status: UserStatus::Active,
                company_id: &company_id,
                ts,
            },
        )
        .await?;
        tx.commit().await?;

        info!("Created super admin {}", email);

        let user = self.get_user_by_id(&user_id).await?;
        Ok(UserPayload::from(&user))
    }

    fn sign(&self, user: &UserCredentials) -> AppResult<AuthPayload> {
        let access_token = self
            .jwt
            .create_token(&user.id, &user.email, user.role, &user.company_id)?;

        Ok(AuthPayload {
            access_token,
            user: UserPayload::from(user),
        })
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password_hash, role, status, company_id FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, user_id: &str) -> AppResult<UserCredentials> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password_hash, role, status, company_id FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }

    async fn company_exists(&self, company_id: &str) -> AppResult<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies WHERE id = ?")
            .bind(company_id)
            .fetch_one(&self.db)
            .await?;

        Ok(count.0 > 0)
    }
}

struct NewUser<'a> {
    id: &'a str,
    name: &'a str,
    email: &'a str,
    password_hash: &'a str,
    role: Role,
    status: UserStatus,
    company_id: &'a str,
    ts: i64,
}

async fn insert_user(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, user: NewUser<'_>) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, status, company_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id)
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role.as_str())
    .bind(user.status.as_str())
    .bind(user.company_id)
    .bind(user.ts)
    .bind(user.ts)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent sign-up
        if is_unique_violation(&e) {
            AppError::conflict(EMAIL_TAKEN)
        } else {
            AppError::from(e)
        }
    })?;

    Ok(())
}

fn require_text(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::invalid_input("A valid email address is required")),
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid_input(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM ").unwrap(), "ana@example.com");
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }
}
