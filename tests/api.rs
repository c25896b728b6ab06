//! API endpoint integration tests

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

mod common;
use chatterbox::Config;
use common::{
    BrokenLlm, FixedLlm, build_test_router, build_test_router_with, create_session, send,
};

const LONG_ANSWER: &str = "Rust is a systems language. It is memory safe. It has no GC. \
     It compiles to native code. It has great tooling.";

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_router(None);
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_ready_reports_degraded_without_llm() {
    let app = build_test_router(None);
    let (status, json) = send(&app, "GET", "/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["llm"]["status"], "unavailable");
    assert_eq!(json["checks"]["speech"]["status"], "unavailable");
}

#[tokio::test]
async fn test_ready_ok_with_llm() {
    let app = build_test_router(Some(Arc::new(FixedLlm("hi"))));
    let (_, json) = send(&app, "GET", "/ready", None).await;

    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["llm"]["message"], "fixed");
}

#[tokio::test]
async fn test_index_serves_html() {
    let app = build_test_router(None);
    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;
        app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap()
    };

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_meta_lists_commands_and_personalities() {
    let app = build_test_router(None);
    let (status, json) = send(&app, "GET", "/api/meta", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["llm_available"], false);
    assert_eq!(json["commands"].as_array().unwrap().len(), 5);
    assert_eq!(json["commands"][0]["name"], "/help");
    assert_eq!(json["personalities"].as_array().unwrap().len(), 5);
    assert_eq!(json["personalities"][0]["id"], "Friendly");
    assert_eq!(json["quick_actions"].as_array().unwrap().len(), 4);
    assert_eq!(json["voice_limits"]["min_rate"], 80);
}

#[tokio::test]
async fn test_voices_empty_with_silent_engine() {
    let app = build_test_router(None);
    let (status, json) = send(&app, "GET", "/api/voices", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["engine"], "silent");
    assert!(json["voices"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = build_test_router(None);
    let id = create_session(&app).await;

    let (status, json) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id.as_str());
    assert_eq!(json["personality"], "Friendly");
    assert!(json["turns"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "session_not_found");
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = build_test_router(None);
    let body = json!({ "content": "hello" });
    let (status, json) = send(&app, "POST", "/api/sessions/nope/messages", Some(body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "session_not_found");
}

#[tokio::test]
async fn test_blank_message_is_400() {
    let app = build_test_router(None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/messages");

    let (status, json) = send(&app, "POST", &uri, Some(json!({ "content": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");

    let (_, session) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    assert!(session["turns"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_degraded_mode_reply_is_recorded() {
    let app = build_test_router(None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/messages");

    let (status, reply) = send(&app, "POST", &uri, Some(json!({ "content": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["kind"], "degraded");
    assert_eq!(reply["text"], chatterbox::llm::DEGRADED_WARNING);

    let (_, session) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    let turns = session["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["user_text"], "hello");
}

#[tokio::test]
async fn test_commands_answer_without_llm() {
    let app = build_test_router(None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/messages");

    let (_, reply) = send(&app, "POST", &uri, Some(json!({ "content": "/about" }))).await;
    assert_eq!(reply["kind"], "command");
    assert_eq!(reply["text"], chatterbox::command::ABOUT_REPLY);
    assert_eq!(reply["spoken"], false);

    let (_, reply) = send(&app, "POST", &uri, Some(json!({ "content": "/nope" }))).await;
    assert_eq!(reply["text"], chatterbox::command::UNKNOWN_COMMAND_REPLY);
}

#[tokio::test]
async fn test_llm_failure_falls_back_offline() {
    let app = build_test_router(Some(Arc::new(BrokenLlm)));
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/messages");

    let (status, reply) = send(&app, "POST", &uri, Some(json!({ "content": "hi" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["kind"], "degraded");
    let text = reply["text"].as_str().unwrap();
    assert!(text.contains("connection refused"));
    assert!(text.contains("Falling back offline"));
}

#[tokio::test]
async fn test_smart_read_and_continue() {
    let app = build_test_router(Some(Arc::new(FixedLlm(LONG_ANSWER))));
    let id = create_session(&app).await;

    let (_, reply) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({ "content": "tell me about rust" })),
    )
    .await;
    assert_eq!(reply["kind"], "chat");
    assert_eq!(
        reply["text"],
        "Rust is a systems language. It is memory safe. It has no GC. ..."
    );
    assert_eq!(reply["has_more"], true);
    assert_eq!(reply["suggestions"].as_array().unwrap().len(), 3);

    let continue_uri = format!("/api/sessions/{id}/continue");
    let (status, more) = send(&app, "POST", &continue_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(more["kind"], "continuation");
    assert_eq!(more["text"], "It compiles to native code. It has great tooling.");

    let (status, json) = send(&app, "POST", &continue_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "nothing_pending");
}

#[tokio::test]
async fn test_clear_leaves_single_turn() {
    let app = build_test_router(Some(Arc::new(FixedLlm("Sure."))));
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/messages");

    for content in ["one", "two", "/time"] {
        send(&app, "POST", &uri, Some(json!({ "content": content }))).await;
    }
    let (_, reply) = send(&app, "POST", &uri, Some(json!({ "content": "/CLEAR" }))).await;
    assert_eq!(reply["text"], chatterbox::command::CLEAR_REPLY);

    let (_, session) = send(&app, "GET", &format!("/api/sessions/{id}"), None).await;
    let turns = session["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0]["kind"], "command");
}

#[tokio::test]
async fn test_settings_update_is_partial_and_clamped() {
    let app = build_test_router(None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/settings");

    let (status, view) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "personality": "Sarcastic", "username": "Sam", "rate": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["personality"], "Sarcastic");
    assert_eq!(view["username"], "Sam");
    assert_eq!(view["tts"]["rate"], 260);

    let (_, view) = send(&app, "PUT", &uri, Some(json!({ "smart_read": false }))).await;
    assert_eq!(view["personality"], "Sarcastic");
    assert_eq!(view["smart_read"], false);
}

#[tokio::test]
async fn test_smart_read_off_returns_whole_answer() {
    let app = build_test_router(Some(Arc::new(FixedLlm(LONG_ANSWER))));
    let id = create_session(&app).await;
    send(
        &app,
        "PUT",
        &format!("/api/sessions/{id}/settings"),
        Some(json!({ "smart_read": false })),
    )
    .await;

    let (_, reply) = send(
        &app,
        "POST",
        &format!("/api/sessions/{id}/messages"),
        Some(json!({ "content": "tell me about rust" })),
    )
    .await;
    assert_eq!(reply["text"], LONG_ANSWER);
    assert_eq!(reply["has_more"], false);
}

#[tokio::test]
async fn test_personality_names_are_case_insensitive() {
    let app = build_test_router(None);
    let id = create_session(&app).await;
    let uri = format!("/api/sessions/{id}/settings");

    let (status, view) = send(&app, "PUT", &uri, Some(json!({ "personality": "formal" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["personality"], "Formal");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "personality": "grumpy" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_abandoned_sessions_expire() {
    let mut config = Config::default();
    config.chat.session_idle = Duration::from_millis(50);
    let app = build_test_router_with(config, None);

    let abandoned = create_session(&app).await;
    tokio::time::sleep(Duration::from_millis(120)).await;
    let active = create_session(&app).await;

    let (status, json) = send(&app, "GET", &format!("/api/sessions/{abandoned}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "session_not_found");

    let (status, _) = send(&app, "GET", &format!("/api/sessions/{active}"), None).await;
    assert_eq!(status, StatusCode::OK);
}
