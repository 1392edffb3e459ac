// src/auth/guard.rs
// Authenticated caller and role checks

use crate::error::{AppError, AppResult};

use super::jwt::Claims;
use super::models::Role;

/// The authenticated caller, decoded from the bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub company_id: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            company_id: claims.company_id,
        }
    }
}

impl CurrentUser {
    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn require_role(&self, roles: &[Role]) -> AppResult<()> {
        if self.has_role(roles) {
            Ok(())
        } else {
            Err(AppError::forbidden("You do not have permission to perform this action"))
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }
}

/// Unwrap the optional viewer of a request
pub fn require_user(viewer: Option<&CurrentUser>) -> AppResult<&CurrentUser> {
    viewer.ok_or(AppError::Unauthenticated)
}

/// Roles that manage a tenant's configuration
pub const MANAGERS: &[Role] = &[Role::CompanyManager, Role::SuperAdmin];
