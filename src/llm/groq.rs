// src/llm/groq.rs
// Groq provider over the OpenAI-compatible chat completions API

use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::{LlmProvider, Message, Response, TokenUsage};
use crate::config::llm::GroqConfig;

#[derive(Clone)]
pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            return Err(anyhow!("Groq API key is required"));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn from_config(config: &GroqConfig) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn parse_response(&self, response: Value, latency_ms: i64) -> Response {
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        let usage = &response["usage"];
        let tokens = TokenUsage {
            input: usage["prompt_tokens"].as_i64().unwrap_or(0),
            output: usage["completion_tokens"].as_i64().unwrap_or(0),
        };

        info!(
            "Groq response: {} input tokens, {} output tokens, {}ms",
            tokens.input, tokens.output, latency_ms
        );

        Response {
            content,
            model: response["model"].as_str().unwrap_or(&self.model).to_string(),
            tokens,
            latency_ms,
        }
    }
}

#[async_trait]
impl LlmProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn chat(&self, messages: Vec<Message>, system: String) -> Result<Response> {
        let start = Instant::now();
        debug!("Sending request to Groq with {} messages", messages.len());

        let mut api_messages = vec![Message::system(system)];
        api_messages.extend(messages);

        let request_body = serde_json::json!({
            "model": self.model,
            "messages": api_messages,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("API returned {}: {}", status, error_text));
        }

        let response_body: Value = response.json().await?;
        let latency_ms = start.elapsed().as_millis() as i64;

        Ok(self.parse_response(response_body, latency_ms))
    }
}
