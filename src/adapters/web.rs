//! Web adapter: browser UI and JSON endpoint served with axum.
//!
//! Routes:
//! - `GET /`: the profile's page
//! - `POST /api/ask`: `{"query": "..."}` → notices plus answer or error
//! - `GET /api/health`: liveness and the active profile/model

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use super::Channel;
use crate::agent::{AgentLoop, Notices, Profile};
use crate::templates;
use crate::Result;

#[derive(Clone)]
struct AppState {
    agent: AgentLoop,
    profile: Profile,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AskResponse {
    notices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Build the router for one profile
pub fn router(agent: AgentLoop, profile: Profile) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/ask", post(ask))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { agent, profile })
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(templates::render_page(state.profile))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "profile": state.profile.name(),
        "model": state.agent.model(),
        "tools": state.agent.tools().tool_names(),
    }))
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> (StatusCode, Json<AskResponse>) {
    let span = info_span!("ask", request_id = %Uuid::new_v4(), profile = %state.profile);
    let notices = Notices::new();

    let result = state
        .agent
        .ask(&request.query, Some(&notices))
        .instrument(span)
        .await;
    let notices = notices.into_vec();

    match result {
        Ok(transcript) => {
            info!(
                "Answered after {} model calls and {} tool calls",
                transcript.model_calls, transcript.tool_calls
            );
            let body = AskResponse { notices, answer: Some(transcript.answer), error: None };
            (StatusCode::OK, Json(body))
        }
        Err(e) if !e.is_run_failure() => {
            let body = AskResponse { notices, answer: None, error: Some(e.to_string()) };
            (StatusCode::BAD_REQUEST, Json(body))
        }
        Err(e) => {
            error!("Agent run failed: {}", e);
            let body = AskResponse { notices, answer: None, error: Some(format!("Error: {e}")) };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
        }
    }
}

/// HTTP channel serving the browser UI
pub struct WebChannel {
    agent: AgentLoop,
    profile: Profile,
    bind: String,
    shutdown: Arc<Notify>,
}

impl WebChannel {
    pub fn new(agent: AgentLoop, profile: Profile, bind: impl Into<String>) -> Self {
        Self {
            agent,
            profile,
            bind: bind.into(),
            shutdown: Arc::new(Notify::new()),
        }
    }
}

impl Channel for WebChannel {
    fn name(&self) -> &str {
        "web"
    }

    fn start(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        let app = router(self.agent.clone(), self.profile);
        let bind = self.bind.clone();
        let shutdown = self.shutdown.clone();
        let profile = self.profile;

        async move {
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Serving {} UI on http://{}", profile, local_addr_label(&listener));

            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    tokio::select! {
                        _ = shutdown.notified() => {}
                        _ = tokio::signal::ctrl_c() => {}
                    }
                    info!("Shutting down web UI");
                })
                .await?;
            Ok(())
        }
    }

    fn stop(&self) -> impl std::future::Future<Output = Result<()>> + Send {
        let shutdown = self.shutdown.clone();
        async move {
            shutdown.notify_one();
            Ok(())
        }
    }
}

fn local_addr_label(listener: &tokio::net::TcpListener) -> String {
    listener
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown address".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::llm::{FakeLlmClient, LlmResponse};
    use crate::agent::{LoopOptions, ToolCallRequest};
    use crate::tools::{LogAnalysisTool, ToolRegistry};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app(client: &Arc<FakeLlmClient>) -> Router {
        let tools = ToolRegistry::from_tools(vec![Box::new(LogAnalysisTool)]);
        let agent = AgentLoop::new(client.clone(), Arc::new(tools), LoopOptions::default());
        router(agent, Profile::Network)
    }

    async fn post_ask(app: Router, body: Value) -> (StatusCode, AskResponse) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/ask")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ask_returns_notices_and_answer() {
        let client = Arc::new(FakeLlmClient::scripted(vec![
            LlmResponse::tool_calls(vec![ToolCallRequest::new(
                "tc_1",
                "analyze_logs",
                json!({"log_data": "%LINK-3-ERROR: Gi0/1 down"}),
            )]),
            LlmResponse::text("Gi0/1 is down; check the cable."),
        ]));

        let (status, body) = post_ask(app(&client), json!({"query": "%LINK-3-ERROR: Gi0/1 down"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.answer.as_deref(), Some("Gi0/1 is down; check the cable."));
        assert!(body.error.is_none());
        assert_eq!(body.notices.len(), 2);
        assert!(body.notices[0].starts_with("Calling tool: analyze_logs"));

        // the tool actually ran and its output reached the model
        let seen = client.received(1);
        assert_eq!(seen.last().unwrap().content, "ERROR: Gi0/1 down");
    }

    #[tokio::test]
    async fn test_ask_rejects_empty_query() {
        let client = Arc::new(FakeLlmClient::new(vec!["unused"]));

        let (status, body) = post_ask(app(&client), json!({"query": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("Please enter a question before submitting."));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_surfaces_model_failure() {
        let client = Arc::new(FakeLlmClient::new(vec![]));

        let (status, body) = post_ask(app(&client), json!({"query": "show version"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.answer.is_none());
        assert!(body.error.unwrap().starts_with("Error: LLM error"));
    }

    #[tokio::test]
    async fn test_index_serves_profile_page() {
        let client = Arc::new(FakeLlmClient::new(vec![]));
        let response = app(&client)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("AI Agent powered Network Assistant"));
    }

    #[tokio::test]
    async fn test_stop_shuts_down_server() {
        let client = Arc::new(FakeLlmClient::new(vec![]));
        let agent = AgentLoop::new(client, Arc::new(ToolRegistry::empty()), LoopOptions::default());
        let channel = Arc::new(WebChannel::new(agent, Profile::Research, "127.0.0.1:0"));
        assert_eq!(channel.name(), "web");

        let server = {
            let channel = channel.clone();
            tokio::spawn(async move { channel.start().await })
        };
        channel.stop().await.unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_health() {
        let client = Arc::new(FakeLlmClient::new(vec![]));
        let response = app(&client)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["profile"], "network");
        assert_eq!(body["model"], "fake-model");
        assert_eq!(body["tools"], json!(["analyze_logs"]));
    }
}
