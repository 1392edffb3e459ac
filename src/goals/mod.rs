// src/goals/mod.rs

pub mod models;
pub mod service;

pub use models::{Goal, UpsertGoalInput};
pub use service::GoalService;
