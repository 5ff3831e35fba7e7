//! LLM client abstraction layer.
//!
//! This module provides:
//! - [`LlmClient`] trait for swappable LLM providers
//! - [`ProviderRegistry`] for creating a client from configuration
//! - [`OpenAiClient`], the OpenAI-compatible chat completions client
//!
//! # Adding a New Provider
//!
//! 1. Create a new file (e.g., `ollama.rs`)
//! 2. Implement `LlmClient` trait
//! 3. Add to `ProviderRegistry::create()`
//! 4. Add config fields in `config.rs`

mod types;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::tools::ToolDefinition;
use crate::Result;

pub use types::*;

pub mod openai;

pub use openai::OpenAiClient;

use super::message::{Message, ToolCallRequest};

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Text content of the response.
    pub content: Option<String>,

    /// Tool calls requested by the LLM.
    pub tool_calls: Vec<ToolCallRequest>,

    /// Reason the response finished.
    pub finish_reason: String,

    /// Token usage statistics.
    pub usage: Usage,
}

impl LlmResponse {
    /// Create a simple text response.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: vec![],
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }

    /// Create a response that only requests tool calls.
    pub fn tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls,
            finish_reason: "tool_calls".to_string(),
            usage: Usage::default(),
        }
    }

    /// Convert into the assistant message appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::assistant_with_tools(self.content.unwrap_or_default(), self.tool_calls)
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl Usage {
    pub fn add(&mut self, other: &Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// LLM client trait: swappable provider abstraction.
///
/// Implement this trait to add a new LLM provider. A failed call is
/// terminal for the agent run that made it; implementations must not
/// retry internally.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send messages and get response.
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse>;

    /// Get the default model for this provider.
    fn default_model(&self) -> &str;
}

/// Provider registry: creates LLM clients from configuration.
///
/// # Example
///
/// ```ignore
/// let client = ProviderRegistry::create(&config)?;
/// let response = client.chat(&messages, &tools).await?;
/// ```
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Create an LLM client from configuration.
    ///
    /// Supported providers:
    /// - `"openai"`: OpenAI-compatible chat completions with bearer API key
    pub fn create(config: &Config) -> Result<Arc<dyn LlmClient>> {
        match config.provider.as_str() {
            "openai" => {
                if config.api_key.is_empty() {
                    return Err(Error::Config(
                        "No API key set. Export OPENAI_API_KEY or run 'netagent onboard'."
                            .to_string(),
                    ));
                }
                let client = OpenAiClient::new(&config.api_key, &config.model)?
                    .with_base_url(&config.base_url)
                    .with_temperature(config.temperature);
                Ok(Arc::new(client))
            }
            other => Err(Error::Config(format!("Unknown provider: {other}"))),
        }
    }

    /// List available provider names.
    pub fn available() -> &'static [&'static str] {
        &["openai"]
    }
}

/// Fake LLM client for testing.
///
/// Replays scripted responses in order and records every message list it
/// was called with.
#[cfg(test)]
pub struct FakeLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<LlmResponse>>,
    calls: std::sync::Mutex<Vec<Vec<Message>>>,
}

#[cfg(test)]
impl FakeLlmClient {
    /// Create with predefined text responses.
    pub fn new(responses: Vec<&str>) -> Self {
        Self::scripted(responses.iter().map(|s| LlmResponse::text(*s)).collect())
    }

    /// Create with an arbitrary sequence of responses.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Create with a single tool call followed by a text response.
    pub fn with_tool_call(name: &str, args: serde_json::Value, final_response: &str) -> Self {
        Self::scripted(vec![
            LlmResponse::tool_calls(vec![ToolCallRequest::new("tc_1", name, args)]),
            LlmResponse::text(final_response),
        ])
    }

    /// Number of `chat` invocations so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Messages received by the `index`-th invocation.
    pub fn received(&self, index: usize) -> Vec<Message> {
        self.calls.lock().unwrap()[index].clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn chat(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .ok_or_else(|| Error::Llm("No more fake responses".to_string()))
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }
}
