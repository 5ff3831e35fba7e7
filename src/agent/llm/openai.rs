//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::Error;
use crate::tools::ToolDefinition;
use crate::Result;

use super::super::message::{Message, Role, ToolCallRequest};
use super::{ChatCompletionResponse, LlmClient, LlmResponse, Usage};

pub const OPENAI_API_URL: &str = "https://api.openai.com";

const REQUEST_TIMEOUT_SECS: u64 = 120;

/// OpenAI chat completions client using bearer API key authentication.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: Client,
}

impl OpenAiClient {
    /// Create a new client for `model` against the public OpenAI endpoint.
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: OPENAI_API_URL.to_string(),
            temperature: 0.0,
            client,
        })
    }

    /// Point the client at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if !base_url.is_empty() {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::Tool => json!({
                    "role": "tool",
                    "tool_call_id": m.tool_call_id.as_deref().unwrap_or_default(),
                    "content": m.content
                }),
                Role::Assistant if m.has_tool_calls() => {
                    let calls: Vec<Value> = m
                        .tool_calls
                        .iter()
                        .map(|tc| {
                            json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": tc.arguments.to_string()
                                }
                            })
                        })
                        .collect();

                    let content = if m.content.is_empty() {
                        Value::Null
                    } else {
                        json!(m.content)
                    };

                    json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": calls
                    })
                }
                role => json!({
                    "role": role.as_str(),
                    "content": m.content
                }),
            })
            .collect()
    }

    fn convert_tools(&self, tools: &[ToolDefinition]) -> Option<Value> {
        if tools.is_empty() {
            return None;
        }

        let functions: Vec<Value> = tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters
                    }
                })
            })
            .collect();

        Some(Value::Array(functions))
    }

    fn parse_response(&self, response: ChatCompletionResponse) -> Result<LlmResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Llm("No choices in response".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                // Models occasionally emit arguments that are not valid JSON;
                // hand them to the tool as a plain string instead of failing.
                let arguments = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(Value::String(tc.function.arguments));
                ToolCallRequest::new(tc.id, tc.function.name, arguments)
            })
            .collect();

        let usage = response
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(LlmResponse {
            content: choice.message.content,
            tool_calls,
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<LlmResponse> {
        let mut request = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": self.convert_messages(messages)
        });

        if let Some(tool_config) = self.convert_tools(tools) {
            request["tools"] = tool_config;
        }

        debug!("Calling {} with {} messages", self.model, messages.len());

        let response = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(Error::Llm(format!("OpenAI API error ({status}): {error_text}")));
        }

        let body: ChatCompletionResponse = response.json().await?;
        self.parse_response(body)
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
