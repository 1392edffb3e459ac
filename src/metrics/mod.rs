// src/metrics/mod.rs
//! Metric catalog, per-company custom metrics and catalog requests

pub mod models;
pub mod seed;
pub mod service;

pub use models::{CreateMetricInput, Metric, MetricRequest, MetricRequestStatus};
pub use service::{MetricService, catalog_for_company};
