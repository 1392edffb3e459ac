// src/dashboard/mod.rs

pub mod models;
pub mod service;
pub mod trends;

pub use models::{DashboardSummary, MetricInsight, Period};
pub use service::DashboardService;
