//! Tool registry - name-keyed lookup of the tools an agent may call

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use super::Tool;

/// Tool definition for LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Immutable set of tools, built once from a fixed list.
///
/// Nothing can be added after construction, so one registry can be
/// shared behind an `Arc` by any number of concurrent agent runs.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    /// Registration order, used for stable definition lists
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self::from_tools(Vec::new())
    }

    /// Build a registry from a fixed list of tools.
    ///
    /// A later tool with the same name replaces an earlier one.
    pub fn from_tools(list: Vec<Box<dyn Tool>>) -> Self {
        let mut tools = HashMap::with_capacity(list.len());
        let mut order = Vec::with_capacity(list.len());

        for tool in list {
            let name = tool.name().to_string();
            if tools.insert(name.clone(), tool).is_none() {
                order.push(name);
            }
        }

        Self { tools, order }
    }

    /// Look up a tool by name
    pub fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get tool definitions for LLM, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order.iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.to_definition())
            .collect()
    }

    /// List registered tool names, in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::DummyTool;

    #[tokio::test]
    async fn test_registry_lookup_and_execute() {
        let registry = ToolRegistry::from_tools(vec![
            Box::new(DummyTool::ok("test_tool", "success")),
        ]);

        assert!(registry.lookup("missing").is_none());

        let tool = registry.lookup("test_tool").unwrap();
        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert_eq!(result, "success");
    }

    #[test]
    fn test_registry_unknown_tool() {
        let registry = ToolRegistry::empty();
        assert!(registry.lookup("unknown").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let registry = ToolRegistry::from_tools(vec![
            Box::new(DummyTool::ok("b", "")),
            Box::new(DummyTool::ok("a", "")),
            Box::new(DummyTool::ok("c", "")),
        ]);

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(registry.tool_names(), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_replaces_earlier_tool() {
        let registry = ToolRegistry::from_tools(vec![
            Box::new(DummyTool::ok("dup", "first")),
            Box::new(DummyTool::ok("dup", "second")),
        ]);

        assert_eq!(registry.len(), 1);
        let result = registry.lookup("dup").unwrap().execute(serde_json::json!({})).await.unwrap();
        assert_eq!(result, "second");
    }
}
