//! Agent module: core agent logic.
//!
//! This module contains:
//! - Message types
//! - LLM client trait and implementations
//! - Agent loop for processing one user submission
//! - Profiles pairing a system prompt with a tool list
//!
//! # Adding a New LLM Provider
//!
//! See [`llm::ProviderRegistry`] for instructions.

mod loop_impl;
mod message;
mod profile;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use llm::{LlmClient, LlmResponse, OpenAiClient, ProviderRegistry, Usage};
pub use loop_impl::{
    AgentLoop, LoopOptions, Notices, ProgressSink, Transcript, INVALID_TOOL_CALL, RETURNING_TO_MODEL,
};
pub use message::{Message, Role, ToolCallRequest};
pub use profile::Profile;
