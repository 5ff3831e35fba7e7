//! Device command tool - run a show command on a network device over SSH

use std::time::Duration;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::debug;
use crate::Result;
use crate::config::DeviceConfig;
use crate::error::Error;
use super::{string_arg, Tool};

const SHELL_METACHARS: &[char] = &[';', '|', '&', '`', '\n', '\r'];

/// Execute a command on the configured network device
pub struct DeviceCommandTool {
    device: DeviceConfig,
}

impl DeviceCommandTool {
    pub fn new(device: DeviceConfig) -> Self {
        Self { device }
    }

    /// The remote side runs the command through a login shell, so anything
    /// that could chain a second command is refused outright.
    fn is_allowed(&self, command: &str) -> bool {
        if command.contains(SHELL_METACHARS) || command.contains("$(") {
            return false;
        }

        let allowed = &self.device.allowed_prefixes;
        if allowed.is_empty() {
            return true;
        }
        let lowered = command.trim().to_lowercase();
        allowed.iter().any(|prefix| {
            let prefix = prefix.to_lowercase();
            match lowered.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
                None => false,
            }
        })
    }

    /// Build the ssh invocation. With a password configured the call goes
    /// through `sshpass -e`, which reads it from `SSHPASS`.
    fn build_command(&self, command: &str) -> Command {
        let d = &self.device;
        let mut cmd = if d.password.is_empty() {
            let mut cmd = Command::new(&d.ssh_program);
            cmd.arg("-o").arg("BatchMode=yes");
            cmd
        } else {
            let mut cmd = Command::new("sshpass");
            cmd.arg("-e").arg(&d.ssh_program).env("SSHPASS", &d.password);
            cmd
        };

        cmd.arg("-p").arg(d.port.to_string())
            .arg("-o").arg(format!("ConnectTimeout={}", d.connect_timeout_secs))
            .arg("-o").arg("StrictHostKeyChecking=accept-new")
            .arg(format!("{}@{}", d.username, d.host))
            .arg(command)
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Tool for DeviceCommandTool {
    fn name(&self) -> &str { "execute_device_command" }
    fn description(&self) -> &str {
        "Executes a Cisco show command on the network device and retrieves its output."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "CLI command to run, e.g. 'show ip interface brief'"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let command = string_arg(&params, "command")?.trim();

        if command.is_empty() {
            return Err(Error::Tool("Command must not be empty".to_string()));
        }
        if !self.is_allowed(command) {
            return Err(Error::Tool(format!(
                "Command '{}' is not allowed; permitted prefixes: {}",
                command,
                self.device.allowed_prefixes.join(", ")
            )));
        }

        debug!("Running '{}' on {}", command, self.device.host);

        let limit = Duration::from_secs(self.device.command_timeout_secs);
        let output = tokio::time::timeout(limit, self.build_command(command).output())
            .await
            .map_err(|_| Error::Tool(format!(
                "Command timed out after {}s on {}",
                self.device.command_timeout_secs, self.device.host
            )))?
            .map_err(|e| Error::Tool(format!("Failed to run ssh: {}", e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            Ok(stdout.to_string())
        } else {
            Err(Error::Tool(format!(
                "Command failed on {} with exit code {}\n{}",
                self.device.host,
                output.status.code().unwrap_or(-1),
                if stderr.trim().is_empty() { stdout } else { stderr }
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.as_std().get_args().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_build_command_key_auth() {
        let tool = DeviceCommandTool::new(DeviceConfig::default());
        let cmd = tool.build_command("show version");

        assert_eq!(cmd.as_std().get_program(), "ssh");
        let args = args_of(&cmd);
        assert_eq!(&args[..2], &["-o", "BatchMode=yes"]);
        assert!(args.contains(&"cisco@198.18.128.3".to_string()));
        assert_eq!(args.last().unwrap(), "show version");
    }

    #[test]
    fn test_build_command_password_auth() {
        let tool = DeviceCommandTool::new(DeviceConfig {
            password: "cisco123".to_string(),
            ..DeviceConfig::default()
        });
        let cmd = tool.build_command("show clock");

        assert_eq!(cmd.as_std().get_program(), "sshpass");
        assert_eq!(&args_of(&cmd)[..2], &["-e", "ssh"]);
        let has_env = cmd.as_std().get_envs().any(|(k, v)| k == "SSHPASS" && v.is_some());
        assert!(has_env);
    }

    #[test]
    fn test_allowed_prefixes() {
        let tool = DeviceCommandTool::new(DeviceConfig::default());
        assert!(tool.is_allowed("show ip interface brief"));
        assert!(tool.is_allowed("  SHOW version"));
        assert!(!tool.is_allowed("configure terminal"));
        assert!(tool.is_allowed("ping"));
        assert!(!tool.is_allowed("showrun"));
        assert!(!tool.is_allowed("pingsweep 10.0.0.0/8"));
    }

    #[test]
    fn test_command_chaining_is_rejected() {
        let tool = DeviceCommandTool::new(DeviceConfig::default());
        for command in [
            "show version; reload",
            "show run && rm -rf /",
            "ping 1.1.1.1 | sh",
            "show `reload`",
            "show $(reload)",
            "show version\nreload",
        ] {
            assert!(!tool.is_allowed(command), "allowed: {command:?}");
        }

        // an empty allow-list still refuses chaining
        let open = DeviceCommandTool::new(DeviceConfig {
            allowed_prefixes: vec![],
            ..DeviceConfig::default()
        });
        assert!(!open.is_allowed("reload; show version"));

        let open = DeviceCommandTool::new(DeviceConfig {
            allowed_prefixes: vec![],
            ..DeviceConfig::default()
        });
        assert!(open.is_allowed("reload"));
    }

    #[tokio::test]
    async fn test_rejected_command_is_tool_error() {
        let tool = DeviceCommandTool::new(DeviceConfig::default());
        let err = tool.execute(json!({"command": "write erase"})).await.unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[tokio::test]
    async fn test_output_passes_through() {
        // `echo` stands in for ssh and prints the arguments it was given
        let tool = DeviceCommandTool::new(DeviceConfig {
            ssh_program: "echo".to_string(),
            ..DeviceConfig::default()
        });
        let out = tool.execute(json!({"command": "show version"})).await.unwrap();
        assert!(out.contains("cisco@198.18.128.3 show version"));
    }

    #[tokio::test]
    async fn test_missing_program_is_tool_error() {
        let tool = DeviceCommandTool::new(DeviceConfig {
            ssh_program: "definitely-not-an-ssh-binary".to_string(),
            ..DeviceConfig::default()
        });
        let err = tool.execute(json!({"command": "show version"})).await.unwrap_err();
        assert!(err.to_string().contains("Failed to run ssh"));
    }
}
