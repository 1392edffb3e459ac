// src/lib.rs
// EcoTrack - multi-tenant sustainability tracking backend

pub mod ai;
pub mod api;
pub mod auth;
pub mod cache;
pub mod companies;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod goals;
pub mod graphql;
pub mod impact;
pub mod llm;
pub mod metrics;
pub mod state;
pub mod users;
