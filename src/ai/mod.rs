// src/ai/mod.rs

pub mod models;
pub mod prompts;
pub mod service;

pub use models::{ChatMessageInput, MetricSuggestion};
pub use service::AiService;
