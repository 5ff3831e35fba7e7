//! Wire types for the OpenAI-compatible chat completions API.
//!
//! Only the fields the agent reads are modelled; everything else in the
//! response body is ignored.

use serde::Deserialize;

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<ApiUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message inside a choice.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    /// Some servers send `null` instead of omitting the field
    #[serde(default)]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

/// Tool call requested by the model.
#[derive(Debug, Deserialize)]
pub struct ApiToolCall {
    pub id: String,
    pub function: ApiFunction,
}

/// Function name plus JSON-encoded arguments.
#[derive(Debug, Deserialize)]
pub struct ApiFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Token usage block.
#[derive(Debug, Default, Deserialize)]
pub struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: usize,
    #[serde(default)]
    pub completion_tokens: usize,
    #[serde(default)]
    pub total_tokens: usize,
}
