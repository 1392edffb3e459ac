// src/ai/models.rs

use async_graphql::{InputObject, SimpleObject};
use serde::{Deserialize, Serialize};

/// One turn of the assistant conversation as sent by the client
#[derive(InputObject, Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageInput {
    /// `user`, `ai`, `assistant` or `system`
    pub role: String,
    pub content: String,
}

#[derive(SimpleObject, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSuggestion {
    pub units: Vec<String>,
    #[serde(alias = "emission_factor")]
    pub emission_factor: f64,
    pub description: String,
}
