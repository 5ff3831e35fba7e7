//! Web search tool - Tavily search API

use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use crate::Result;
use crate::config::SearchConfig;
use crate::error::Error;
use super::{string_arg, Tool};

const MAX_OUTPUT_CHARS: usize = 10_000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Search the web through the Tavily API
pub struct WebSearchTool {
    config: SearchConfig,
    client: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    fn render(results: &[SearchResult]) -> String {
        if results.is_empty() {
            return "No results found.".to_string();
        }

        let text = results.iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.url, r.content.trim()))
            .collect::<Vec<_>>()
            .join("\n\n");

        truncate(text, MAX_OUTPUT_CHARS)
    }
}

fn truncate(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let total = text.chars().count();
            format!("{}...\n\n[Truncated - {} total chars]", &text[..cut], total)
        }
        None => text,
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str { "web_search" }
    fn description(&self) -> &str {
        "Search the web for current information. Returns titles, URLs and snippets of the top results."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let query = string_arg(&params, "query")?;

        if self.config.api_key.is_empty() {
            return Err(Error::Tool(
                "Web search is not configured: set TAVILY_API_KEY".to_string(),
            ));
        }

        debug!("Searching for: {}", query);

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let response = self.client.post(&url)
            .json(&json!({
                "api_key": self.config.api_key,
                "query": query,
                "max_results": self.config.max_results
            }))
            .send()
            .await
            .map_err(|e| Error::Tool(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tool(format!("Search API error ({}): {}", status, body)));
        }

        let body: SearchResponse = response.json().await
            .map_err(|e| Error::Tool(format!("Invalid search response: {}", e)))?;

        Ok(Self::render(&body.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_for(server: &mockito::Server, api_key: &str) -> WebSearchTool {
        WebSearchTool::new(SearchConfig {
            api_key: api_key.to_string(),
            base_url: server.url(),
            ..SearchConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_renders_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_body(mockito::Matcher::PartialJson(json!({"query": "OSPF stuck in EXSTART", "max_results": 4})))
            .with_status(200)
            .with_body(
                json!({
                    "results": [
                        {"title": "MTU mismatch", "url": "https://a.example/1", "content": "Check interface MTU."},
                        {"title": "Duplicate router-id", "url": "https://b.example/2", "content": "Verify router-id."}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = tool_for(&server, "tvly-test")
            .execute(json!({"query": "OSPF stuck in EXSTART"}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.starts_with("1. MTU mismatch\n   https://a.example/1"));
        assert!(result.contains("2. Duplicate router-id"));
    }

    #[tokio::test]
    async fn test_search_without_api_key_fails() {
        let server = mockito::Server::new_async().await;
        let err = tool_for(&server, "").execute(json!({"query": "x"})).await.unwrap_err();
        assert!(err.to_string().contains("TAVILY_API_KEY"));
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/search").with_status(401).with_body("bad key").create_async().await;

        let err = tool_for(&server, "tvly-bad").execute(json!({"query": "x"})).await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(WebSearchTool::render(&[]), "No results found.");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "é".repeat(20);
        let cut = truncate(text, 5);
        assert!(cut.starts_with("ééééé..."));
        assert!(cut.contains("20 total chars"));
    }
}
