// src/users/mod.rs

pub mod models;
pub mod service;

pub use models::User;
pub use service::UserService;
