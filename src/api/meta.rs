//! Chat UI page and the static data it renders from

use std::sync::Arc;

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{ApiError, ApiState};
use crate::command::{COMMANDS, CommandInfo};
use crate::persona::Personality;
use crate::session::{GREETING, MAX_RATE, MAX_VOLUME, MIN_RATE, MIN_VOLUME};
use crate::text::{QUICK_ACTIONS, QuickAction};
use crate::voice::VoiceInfo;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Serialize)]
pub struct PersonalityInfo {
    pub id: Personality,
    pub name: &'static str,
    pub style: &'static str,
}

/// Allowed ranges for the voice sliders
#[derive(Serialize)]
pub struct VoiceLimits {
    pub min_rate: u32,
    pub max_rate: u32,
    pub min_volume: f32,
    pub max_volume: f32,
}

/// Everything the UI needs before the first session exists
#[derive(Serialize)]
pub struct MetaResponse {
    pub version: &'static str,
    pub greeting: &'static str,
    pub llm_available: bool,
    pub speech_available: bool,
    pub commands: &'static [CommandInfo],
    pub personalities: Vec<PersonalityInfo>,
    pub quick_actions: &'static [QuickAction],
    pub voice_limits: VoiceLimits,
}

#[derive(Serialize)]
pub struct VoicesResponse {
    pub engine: String,
    pub voices: Vec<VoiceInfo>,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn meta(State(state): State<Arc<ApiState>>) -> Json<MetaResponse> {
    Json(MetaResponse {
        version: env!("CARGO_PKG_VERSION"),
        greeting: GREETING,
        llm_available: state.processor.llm_available(),
        speech_available: state.processor.speech().is_available(),
        commands: &COMMANDS,
        personalities: Personality::ALL
            .into_iter()
            .map(|p| PersonalityInfo {
                id: p,
                name: p.name(),
                style: p.style(),
            })
            .collect(),
        quick_actions: &QUICK_ACTIONS,
        voice_limits: VoiceLimits {
            min_rate: MIN_RATE,
            max_rate: MAX_RATE,
            min_volume: MIN_VOLUME,
            max_volume: MAX_VOLUME,
        },
    })
}

async fn voices(State(state): State<Arc<ApiState>>) -> Result<Json<VoicesResponse>, ApiError> {
    let engine = state.processor.speech();
    let voices = engine.voices().await?;
    tracing::debug!(engine = engine.name(), count = voices.len(), "listed voices");

    Ok(Json(VoicesResponse {
        engine: engine.name().to_string(),
        voices,
    }))
}

/// Build the UI and metadata router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/meta", get(meta))
        .route("/api/voices", get(voices))
        .with_state(state)
}
