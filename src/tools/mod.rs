//! Tools module - agent capabilities
//!
//! Tools are external actions the agent can take: searching the web,
//! running a show command on a network device, and scanning logs.

mod device;
mod logs;
mod registry;
mod search;

pub use device::DeviceCommandTool;
pub use logs::{analyze_logs, LogAnalysisTool};
pub use registry::{ToolDefinition, ToolRegistry};
pub use search::WebSearchTool;

use async_trait::async_trait;
use serde_json::Value;
use crate::Result;
use crate::error::Error;

/// Tool trait - interface for all agent tools
///
/// A returned `Err` is not fatal: the agent loop turns it into text the
/// model can read.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name used in function calls
    fn name(&self) -> &str;
    
    /// Description of what the tool does
    fn description(&self) -> &str;
    
    /// JSON Schema for parameters
    fn parameters(&self) -> Value;
    
    /// Execute the tool with given parameters
    async fn execute(&self, params: Value) -> Result<String>;
    
    /// Convert to tool definition for LLM
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// Read a required string argument.
///
/// Models sometimes pass the bare string instead of an object, the way
/// single-input tools are usually invoked, so a top-level string is
/// accepted as the value of `key` too.
pub(crate) fn string_arg<'a>(params: &'a Value, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .or_else(|| params.as_str())
        .ok_or_else(|| Error::Tool(format!("Missing '{}' parameter", key)))
}

/// Dummy tool for testing
#[cfg(test)]
pub struct DummyTool {
    pub name: String,
    pub result: std::result::Result<String, String>,
}

#[cfg(test)]
impl DummyTool {
    pub fn ok(name: &str, result: &str) -> Self {
        Self { name: name.to_string(), result: Ok(result.to_string()) }
    }

    pub fn failing(name: &str, message: &str) -> Self {
        Self { name: name.to_string(), result: Err(message.to_string()) }
    }
}

#[cfg(test)]
#[async_trait]
impl Tool for DummyTool {
    fn name(&self) -> &str { &self.name }
    fn description(&self) -> &str { "Dummy tool for testing" }
    fn parameters(&self) -> Value { serde_json::json!({"type": "object"}) }
    
    async fn execute(&self, _params: Value) -> Result<String> {
        self.result.clone().map_err(Error::Tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_arg_from_object() {
        let params = json!({"query": "show version"});
        assert_eq!(string_arg(&params, "query").unwrap(), "show version");
    }

    #[test]
    fn test_string_arg_from_bare_string() {
        let params = json!("show clock");
        assert_eq!(string_arg(&params, "command").unwrap(), "show clock");
    }

    #[test]
    fn test_string_arg_missing() {
        let err = string_arg(&json!({}), "query").unwrap_err();
        assert!(err.to_string().contains("'query'"));
    }
}
