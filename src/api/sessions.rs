//! Session endpoints
//!
//! Each handler locks only its own session, so turns within a session are
//! serialized while different sessions proceed independently.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::persona::Personality;
use crate::pipeline::TurnReply;
use crate::session::{Session, SettingsUpdate, TtsSettings, Turn};

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Transcript and settings of one session
#[derive(Serialize)]
pub struct SessionView {
    pub id: String,
    pub created_at: DateTime<Local>,
    pub personality: Personality,
    pub username: Option<String>,
    pub voice_enabled: bool,
    pub smart_read: bool,
    pub tts: TtsSettings,
    pub has_more: bool,
    pub turns: Vec<Turn>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            created_at: session.created_at(),
            personality: session.personality(),
            username: session.username().map(ToString::to_string),
            voice_enabled: session.voice_enabled(),
            smart_read: session.smart_read(),
            tts: session.tts().clone(),
            has_more: session.pending_remainder().is_some(),
            turns: session.turns().to_vec(),
        }
    }
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

async fn create_session(
    State(state): State<Arc<ApiState>>,
) -> (StatusCode, Json<CreatedResponse>) {
    let id = state.sessions.create(Session::configured(&state.config)).await;
    tracing::info!(session_id = %id, "session created");
    (StatusCode::CREATED, Json(CreatedResponse { id }))
}

async fn get_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let shared = state.sessions.get(&id).await?;
    let session = shared.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

async fn end_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id).await?;
    tracing::info!(session_id = %id, "session ended");
    Ok(StatusCode::NO_CONTENT)
}

async fn update_settings(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<SessionView>, ApiError> {
    let shared = state.sessions.get(&id).await?;
    let mut session = shared.lock().await;
    session.apply(update);
    tracing::debug!(
        session_id = %id,
        personality = %session.personality(),
        voice = session.voice_enabled(),
        "settings updated"
    );
    Ok(Json(SessionView::from(&*session)))
}

async fn send_message(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    let shared = state.sessions.get(&id).await?;
    let mut session = shared.lock().await;

    state
        .processor
        .process(&mut session, &request.content)
        .await
        .map(Json)
        .ok_or(ApiError::BadRequest("message content is empty"))
}

async fn continue_reading(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<TurnReply>, ApiError> {
    let shared = state.sessions.get(&id).await?;
    let mut session = shared.lock().await;

    state
        .processor
        .continue_reading(&mut session)
        .await
        .map(Json)
        .ok_or(ApiError::NothingPending)
}

/// Build session router (nested under `/api/sessions`)
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/{id}", get(get_session).delete(end_session))
        .route("/{id}/settings", put(update_settings))
        .route("/{id}/messages", post(send_message))
        .route("/{id}/continue", post(continue_reading))
        .with_state(state)
}
