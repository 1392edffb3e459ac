// src/auth/models.rs

use async_graphql::{Enum, InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Platform role carried in the token
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    CompanyManager,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::CompanyManager => "COMPANY_MANAGER",
            Role::User => "USER",
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "COMPANY_MANAGER" => Ok(Role::CompanyManager),
            "USER" => Ok(Role::User),
            _ => Err(UnknownVariant { kind: "role", value }),
        }
    }
}

/// Account approval state
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending,
    Active,
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "PENDING",
            UserStatus::Active => "ACTIVE",
            UserStatus::Rejected => "REJECTED",
        }
    }
}

impl TryFrom<String> for UserStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PENDING" => Ok(UserStatus::Pending),
            "ACTIVE" => Ok(UserStatus::Active),
            "REJECTED" => Ok(UserStatus::Rejected),
            _ => Err(UnknownVariant { kind: "user status", value }),
        }
    }
}

/// User row including the password hash, never exposed over the API
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub company_id: String,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Join an existing company as a pending user
#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_id: String,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct CompanyCreateInput {
    pub name: String,
    pub sector: String,
    pub employees_count: i32,
}

#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct AdminCreateInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Onboard a new tenant together with its first manager
#[derive(InputObject, Debug, Clone, Deserialize)]
pub struct RegisterCompanyInput {
    pub company: CompanyCreateInput,
    pub admin: AdminCreateInput,
}

#[derive(SimpleObject, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: String,
    pub status: UserStatus,
}

impl From<&UserCredentials> for UserPayload {
    fn from(user: &UserCredentials) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            company_id: user.company_id.clone(),
            status: user.status,
        }
    }
}

#[derive(SimpleObject, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub user: UserPayload,
}
