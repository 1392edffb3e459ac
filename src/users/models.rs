// src/users/models.rs

use async_graphql::SimpleObject;
use serde::Serialize;

use crate::auth::{Role, UserStatus};

/// User as exposed through the API
#[derive(SimpleObject, Debug, Clone, Serialize, sqlx::FromRow)]
#[graphql(complex)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    pub company_id: String,
    #[graphql(skip)]
    pub created_at: i64,
    #[graphql(skip)]
    pub updated_at: i64,
}
