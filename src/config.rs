//! Configuration management
//!
//! Configuration lives in `~/.netagent/config.json`. Every field has a
//! default, so a missing file or a partial file is fine. Environment
//! variables are applied on top of the file so secrets can stay out of it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::Result;
use crate::error::Error;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider to use
    #[serde(default = "default_provider")]
    pub provider: String,

    /// API key for the provider
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    /// Maximum model invocations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Deadline for a whole run, in seconds
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,

    /// Deadline for a single tool invocation, in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub web: WebConfig,
}

/// Web search (Tavily) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_search_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

/// Network device reached by the device command tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_host")]
    pub host: String,

    #[serde(default = "default_device_port")]
    pub port: u16,

    #[serde(default = "default_device_username")]
    pub username: String,

    /// Leave empty to use key-based authentication
    #[serde(default)]
    pub password: String,

    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Commands must start with one of these; empty allows anything
    #[serde(default = "default_allowed_prefixes")]
    pub allowed_prefixes: Vec<String>,
}

/// Browser UI server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_base_url() -> String {
    crate::agent::llm::openai::OPENAI_API_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_iterations() -> usize {
    20
}

fn default_run_timeout() -> u64 {
    300
}

fn default_tool_timeout() -> u64 {
    60
}

fn default_search_url() -> String {
    "https://api.tavily.com".to_string()
}

fn default_max_results() -> usize {
    4
}

fn default_search_timeout() -> u64 {
    30
}

fn default_device_host() -> String {
    "198.18.128.3".to_string()
}

fn default_device_port() -> u16 {
    22
}

fn default_device_username() -> String {
    "cisco".to_string()
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_command_timeout() -> u64 {
    30
}

fn default_allowed_prefixes() -> Vec<String> {
    ["show", "ping", "traceroute"].iter().map(|s| s.to_string()).collect()
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            max_iterations: default_max_iterations(),
            run_timeout_secs: default_run_timeout(),
            tool_timeout_secs: default_tool_timeout(),
            search: SearchConfig::default(),
            device: DeviceConfig::default(),
            web: WebConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_search_url(),
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_device_host(),
            port: default_device_port(),
            username: default_device_username(),
            password: String::new(),
            ssh_program: default_ssh_program(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
            allowed_prefixes: default_allowed_prefixes(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Config {
    /// Override fields from environment-style variables.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        };

        set(&mut self.api_key, "OPENAI_API_KEY");
        set(&mut self.base_url, "OPENAI_BASE_URL");
        set(&mut self.model, "NETAGENT_MODEL");
        set(&mut self.search.api_key, "TAVILY_API_KEY");
        set(&mut self.device.host, "NETAGENT_DEVICE_HOST");
        set(&mut self.device.username, "NETAGENT_DEVICE_USER");
        set(&mut self.device.password, "NETAGENT_DEVICE_PASSWORD");
    }

    /// Check values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be at least 1".to_string()));
        }
        if self.run_timeout_secs == 0 || self.tool_timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least 1 second".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".netagent")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default path plus the process environment
pub fn load() -> Result<Config> {
    let mut config = load_from(&config_path())?;
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file; a missing file yields defaults
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config at {:?}: {}", path, e)))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Replace a stored secret unless the prompt was left empty
fn keep_secret(current: &mut String, input: String) {
    let input = input.trim();
    if !input.is_empty() {
        *current = input.to_string();
    }
}

/// Interactively create the configuration file
pub fn onboard() -> Result<()> {
    use crate::ui;
    use inquire::{Confirm, Password, Text};

    let prompt_err = |e: inquire::InquireError| Error::Config(format!("Prompt failed: {}", e));

    ui::print_step("Let's configure netagent.");

    let path = config_path();
    let mut config = load_from(&path)?;

    let api_key = Password::new("OpenAI API key (leave empty to keep the current one):")
        .without_confirmation()
        .prompt()
        .map_err(prompt_err)?;
    keep_secret(&mut config.api_key, api_key);

    config.model = Text::new("Model:")
        .with_default(&config.model)
        .prompt()
        .map_err(prompt_err)?;

    let search_key = Password::new("Tavily API key (leave empty to keep the current one):")
        .without_confirmation()
        .prompt()
        .map_err(prompt_err)?;
    keep_secret(&mut config.search.api_key, search_key);

    let setup_device = Confirm::new("Configure a network device for the network assistant?")
        .with_default(true)
        .prompt()
        .map_err(prompt_err)?;

    if setup_device {
        config.device.host = Text::new("Device address:")
            .with_default(&config.device.host)
            .prompt()
            .map_err(prompt_err)?;
        config.device.username = Text::new("Username:")
            .with_default(&config.device.username)
            .prompt()
            .map_err(prompt_err)?;
        let password = Password::new("Password (leave empty to keep the current one):")
            .without_confirmation()
            .prompt()
            .map_err(prompt_err)?;
        keep_secret(&mut config.device.password, password);
    }

    ui::print_step("Saving configuration");
    save_to(&config, &path)?;
    ui::print_success(&format!("Saved to {:?}", path));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_iterations, 20);
        assert_eq!(config.search.max_results, 4);
        assert_eq!(config.device.username, "cisco");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_from(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(config.provider, "openai");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"model": "gpt-4", "device": {"host": "10.1.1.1"}}"#).unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.device.host, "10.1.1.1");
        assert_eq!(config.device.port, 22);
        assert_eq!(config.run_timeout_secs, 300);
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let config = Config { max_iterations: 7, ..Config::default() };

        save_to(&config, &path).unwrap();
        assert_eq!(load_from(&path).unwrap().max_iterations, 7);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-env"),
            ("TAVILY_API_KEY", "tvly-env"),
            ("NETAGENT_DEVICE_PASSWORD", "secret"),
            ("NETAGENT_MODEL", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.search.api_key, "tvly-env");
        assert_eq!(config.device.password, "secret");
        // empty values do not clobber
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = Config { max_iterations: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_prompt_keeps_saved_secret() {
        let mut key = "sk-saved".to_string();
        keep_secret(&mut key, String::new());
        assert_eq!(key, "sk-saved");

        keep_secret(&mut key, "  ".to_string());
        assert_eq!(key, "sk-saved");

        keep_secret(&mut key, "sk-new".to_string());
        assert_eq!(key, "sk-new");
    }
}
