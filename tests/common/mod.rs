//! Shared test utilities

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chatterbox::api::ApiState;
use chatterbox::{Config, Error, LlmClient, Result, SilentEngine, TurnProcessor};
use tower::ServiceExt;

/// LLM that always answers with the same text
pub struct FixedLlm(pub &'static str);

#[async_trait]
impl LlmClient for FixedLlm {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// LLM whose every call fails
pub struct BrokenLlm;

#[async_trait]
impl LlmClient for BrokenLlm {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Llm("connection refused".to_string()))
    }
}

/// Build a test API router around an optional LLM and a silent speech engine
pub fn build_test_router(llm: Option<Arc<dyn LlmClient>>) -> axum::Router {
    build_test_router_with(Config::default(), llm)
}

/// Same as [`build_test_router`] with explicit configuration
pub fn build_test_router_with(config: Config, llm: Option<Arc<dyn LlmClient>>) -> axum::Router {
    let processor = TurnProcessor::new(llm, Arc::new(SilentEngine)).chat_config(&config.chat);
    chatterbox::api::router(Arc::new(ApiState::new(processor, config)))
}

/// Send a request and decode the JSON body (`Null` when empty)
pub async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Create a session and return its id
pub async fn create_session(app: &axum::Router) -> String {
    let (status, json) = send(app, "POST", "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}
