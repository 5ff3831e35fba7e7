//! Agent loop - core message processing
//!
//! One run alternates between the model and the tools it asks for until
//! the model answers without requesting any tool. Tool problems (unknown
//! name, failure, timeout) become observations for the model; only model
//! failures and the run guards end a run with an error.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::tools::ToolRegistry;
use crate::Result;

use super::llm::{LlmClient, Usage};
use super::message::{Message, Role, ToolCallRequest};

/// Observation handed back when the model names a tool that does not exist
pub const INVALID_TOOL_CALL: &str = "Invalid tool call, retrying...";

/// Notice emitted after a batch of tool results has been appended
pub const RETURNING_TO_MODEL: &str = "Returning to LLM with tool results...";

/// Receiver for informational progress notices during a run.
///
/// Notices never influence control flow.
pub trait ProgressSink: Send + Sync {
    fn notice(&self, text: &str);
}

/// Collects notices in memory, in emission order
#[derive(Default)]
pub struct Notices {
    items: Mutex<Vec<String>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressSink for Notices {
    fn notice(&self, text: &str) {
        if let Ok(mut items) = self.items.lock() {
            items.push(text.to_string());
        }
    }
}

/// Per-loop settings, fixed at construction
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Prepended to every model invocation when set
    pub system_prompt: Option<String>,
    /// Maximum model invocations per run
    pub max_iterations: usize,
    /// Deadline for the whole run
    pub run_timeout: Duration,
    /// Deadline for each tool invocation
    pub tool_timeout: Duration,
}

impl LoopOptions {
    pub fn from_config(config: &Config, system_prompt: Option<String>) -> Self {
        Self {
            system_prompt,
            max_iterations: config.max_iterations,
            run_timeout: Duration::from_secs(config.run_timeout_secs),
            tool_timeout: Duration::from_secs(config.tool_timeout_secs),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), None)
    }
}

/// Outcome of one completed run
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Content of the first assistant message without tool calls
    pub answer: String,
    /// Initial messages followed by everything the run appended
    pub messages: Vec<Message>,
    pub model_calls: usize,
    pub tool_calls: usize,
    pub usage: Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    AwaitingModel,
    AwaitingTools,
}

/// The agent loop processes messages through LLM and tool execution.
///
/// The client and registry are shared, so one loop can serve many
/// concurrent runs; each run owns its own message list.
#[derive(Clone)]
pub struct AgentLoop {
    client: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    options: LoopOptions,
}

impl AgentLoop {
    /// Create a new agent loop
    pub fn new(client: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, options: LoopOptions) -> Self {
        Self { client, tools, options }
    }

    pub fn options(&self) -> &LoopOptions {
        &self.options
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model(&self) -> &str {
        self.client.default_model()
    }

    /// Run one user submission: trim it, reject empty input, then run.
    pub async fn ask(&self, text: &str, progress: Option<&dyn ProgressSink>) -> Result<Transcript> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.run_conversation(vec![Message::user(text)], progress).await
    }

    /// Run the loop and return only the final answer
    pub async fn run(&self, initial: Vec<Message>) -> Result<String> {
        Ok(self.run_conversation(initial, None).await?.answer)
    }

    /// Run the loop and return the answer with the full transcript
    pub async fn run_conversation(
        &self,
        initial: Vec<Message>,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Transcript> {
        match initial.last() {
            None => {
                return Err(Error::InvalidConversation("no messages".to_string()));
            }
            Some(last) if last.role != Role::User => {
                return Err(Error::InvalidConversation(format!(
                    "last message must come from the user, got {}",
                    last.role.as_str()
                )));
            }
            Some(last) => info!("Starting agent loop with message: {}", last.content),
        }

        let limit = self.options.run_timeout;
        tokio::time::timeout(limit, self.drive(initial, progress))
            .await
            .map_err(|_| Error::Timeout(limit))?
    }

    async fn drive(
        &self,
        mut messages: Vec<Message>,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<Transcript> {
        let definitions = self.tools.definitions();
        let max = self.options.max_iterations;
        let mut state = LoopState::AwaitingModel;
        let mut model_calls = 0;
        let mut tool_calls = 0;
        let mut usage = Usage::default();

        loop {
            match state {
                LoopState::AwaitingModel => {
                    if model_calls >= max {
                        warn!("Giving up after {} model calls", model_calls);
                        return Err(Error::MaxIterations(max));
                    }
                    model_calls += 1;
                    debug!("Iteration {}/{}", model_calls, max);

                    let response = self.client.chat(&self.prompt(&messages), &definitions).await?;
                    usage.add(&response.usage);
                    debug!("Model finished with reason '{}'", response.finish_reason);

                    let message = response.into_message();
                    if !message.has_tool_calls() {
                        info!("Agent completed with response: {} chars", message.content.len());
                        let answer = message.content.clone();
                        messages.push(message);
                        return Ok(Transcript {
                            answer,
                            messages,
                            model_calls,
                            tool_calls,
                            usage,
                        });
                    }

                    messages.push(message);
                    state = LoopState::AwaitingTools;
                }
                LoopState::AwaitingTools => {
                    let requests = messages
                        .last()
                        .map(|m| m.tool_calls.clone())
                        .unwrap_or_default();

                    for request in &requests {
                        notify(
                            progress,
                            &format!("Calling tool: {} with arguments: {}", request.name, request.arguments),
                        );
                        let result = self.execute_tool(request).await;
                        messages.push(Message::tool_result(request, result));
                        tool_calls += 1;
                    }

                    notify(progress, RETURNING_TO_MODEL);
                    state = LoopState::AwaitingModel;
                }
            }
        }
    }

    /// Messages as presented to the model: system prompt first, if any
    fn prompt(&self, messages: &[Message]) -> Vec<Message> {
        let mut prompt = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = &self.options.system_prompt {
            prompt.push(Message::system(system.as_str()));
        }
        prompt.extend_from_slice(messages);
        prompt
    }

    async fn execute_tool(&self, tool_call: &ToolCallRequest) -> String {
        debug!("Executing tool: {} with args: {}", tool_call.name, tool_call.arguments);

        let Some(tool) = self.tools.lookup(&tool_call.name) else {
            warn!("Model requested unknown tool: {}", tool_call.name);
            return INVALID_TOOL_CALL.to_string();
        };

        let limit = self.options.tool_timeout;
        match tokio::time::timeout(limit, tool.execute(tool_call.arguments.clone())).await {
            Ok(Ok(result)) => {
                debug!("Tool {} succeeded: {} chars", tool_call.name, result.len());
                result
            }
            Ok(Err(e)) => {
                let error_msg = format!("Error: {}", e);
                debug!("Tool {} failed: {}", tool_call.name, error_msg);
                error_msg
            }
            Err(_) => {
                warn!("Tool {} timed out after {:?}", tool_call.name, limit);
                format!("Error: tool '{}' timed out after {:?}", tool_call.name, limit)
            }
        }
    }
}

fn notify(progress: Option<&dyn ProgressSink>, text: &str) {
    info!("{}", text);
    if let Some(sink) = progress {
        sink.notice(text);
    }
}
