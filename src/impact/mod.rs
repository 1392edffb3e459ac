// src/impact/mod.rs
//! Monthly impact ledger

pub mod emissions;
pub mod models;
pub mod service;

pub use models::{CreateImpactRecordInput, ImpactRecord, ImpactValue, ImpactValueInput};
pub use service::ImpactService;
