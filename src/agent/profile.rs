//! Agent profiles: a persona is a system prompt plus a fixed tool list.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::tools::{DeviceCommandTool, LogAnalysisTool, Tool, ToolRegistry, WebSearchTool};
use crate::Result;

use super::llm::ProviderRegistry;
use super::loop_impl::{AgentLoop, LoopOptions};

const RESEARCH_PROMPT: &str = "\
You are an intelligent assistant that retrieves relevant information. \
Analyze the question carefully and use external knowledge when needed. \
You may issue multiple information requests when necessary. \
Ensure responses are well-structured and accurate.";

const NETWORK_PROMPT: &str = r#"You are a Smart Network Assistant designed to help network engineers troubleshoot and manage network devices efficiently.
Your primary tasks include checking device configurations, analyzing logs, and providing actionable insights for troubleshooting.

Work step by step: reason about the request, call a tool when you need data from the device or need logs scanned, read the result, and then answer.

### Tools Available:
- execute_device_command: run a show command on the device, e.g. `show running-config` or `show ip interface brief`.
- analyze_logs: scan log text for errors and warnings.

### Guidelines:
- Always prioritize clarity and precision in your responses.
- If a command or log needs clarification, politely ask for more details.
- Assume you are working in a professional network environment and maintain a concise, professional tone.
- If the query itself is a block of logs, analyze it, identify the issue, and suggest troubleshooting and remediation steps.

Example:
Query: Check the current interface statuses on the router.
You call execute_device_command with `show ip interface brief`, then answer:
Here are the current interface statuses:
- FastEthernet0/0: IP 192.168.1.1 is UP and running.
- FastEthernet0/1: No IP assigned and the interface is DOWN.

Stay within your role as a Smart Network Assistant, and always aim to assist the user with their tasks."#;

/// Which assistant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Web research assistant with a search tool
    Research,
    /// Network assistant with device command and log analysis tools
    Network,
}

impl Profile {
    pub fn all() -> &'static [Profile] {
        &[Profile::Research, Profile::Network]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Research => "research",
            Profile::Network => "network",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Profile::Research => "AI Research Assistant",
            Profile::Network => "AI Agent powered Network Assistant",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Profile::Research => RESEARCH_PROMPT,
            Profile::Network => NETWORK_PROMPT,
        }
    }

    /// Build the profile's fixed tool list
    pub fn tools(&self, config: &Config) -> Result<ToolRegistry> {
        let tools: Vec<Box<dyn Tool>> = match self {
            Profile::Research => vec![Box::new(WebSearchTool::new(config.search.clone())?)],
            Profile::Network => vec![
                Box::new(DeviceCommandTool::new(config.device.clone())),
                Box::new(LogAnalysisTool),
            ],
        };
        Ok(ToolRegistry::from_tools(tools))
    }

    /// Build a ready-to-run agent for this profile.
    pub fn build_agent(&self, config: &Config) -> Result<AgentLoop> {
        let client = ProviderRegistry::create(config)?;
        self.build_agent_with(client, config)
    }

    /// Build an agent around an existing client
    pub fn build_agent_with(
        &self,
        client: Arc<dyn super::llm::LlmClient>,
        config: &Config,
    ) -> Result<AgentLoop> {
        let tools = Arc::new(self.tools(config)?);
        let options = LoopOptions::from_config(config, Some(self.system_prompt().to_string()));
        Ok(AgentLoop::new(client, tools, options))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Profile::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown profile '{s}' (expected research or network)"))
    }
}
