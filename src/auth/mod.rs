// src/auth/mod.rs

pub mod guard;
pub mod jwt;
pub mod models;
pub mod password;
pub mod service;

pub use guard::{CurrentUser, MANAGERS, require_user};
pub use jwt::{Claims, JwtManager};
pub use models::{
    AuthPayload, LoginInput, RegisterCompanyInput, RegisterInput, Role, UserPayload, UserStatus,
};
pub use service::AuthService;
