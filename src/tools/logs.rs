//! Log analysis tool - pull error and warning lines out of pasted logs

use std::sync::OnceLock;
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use crate::Result;
use super::{string_arg, Tool};

pub const NO_ISSUES: &str = "No issues found in the logs.";

fn error_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)error.*").expect("valid regex"))
}

fn warning_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)warning.*").expect("valid regex"))
}

/// Collect every `error...` and `warning...` fragment (to end of line),
/// errors first. Matching is case-insensitive.
pub fn analyze_logs(log_data: &str) -> String {
    let issues: Vec<&str> = error_pattern()
        .find_iter(log_data)
        .chain(warning_pattern().find_iter(log_data))
        .map(|m| m.as_str().trim_end_matches('\r'))
        .collect();

    if issues.is_empty() {
        NO_ISSUES.to_string()
    } else {
        issues.join("\n")
    }
}

/// Scan logs for errors and warnings
pub struct LogAnalysisTool;

#[async_trait]
impl Tool for LogAnalysisTool {
    fn name(&self) -> &str { "analyze_logs" }
    fn description(&self) -> &str { "Analyzes logs and reports any errors or warnings found." }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "log_data": {
                    "type": "string",
                    "description": "Raw log text to analyze"
                }
            },
            "required": ["log_data"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let log_data = string_arg(&params, "log_data")?;
        Ok(analyze_logs(log_data))
    }
}
