// src/companies/mod.rs

pub mod models;
pub mod service;

pub use models::{Company, CompanyMetric, PublicCompany};
pub use service::CompanyService;
