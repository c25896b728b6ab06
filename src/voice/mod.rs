//! Voice output
//!
//! Replies are handed to a [`SpeechEngine`]. The default engine drives a local
//! `espeak-ng` binary; without one, speech is silently skipped.

mod tts;

pub use tts::{EspeakEngine, parse_voice_list, speakable};

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::Result;
use crate::config::VoiceConfig;
use crate::session::TtsSettings;

/// A voice offered by the speech engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceInfo {
    /// Identifier passed back in `TtsSettings::voice_id`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Gender tag as reported by the engine, if any
    pub gender: Option<String>,
}

/// Produces audible speech from text
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Engine label for logs and readiness checks
    fn name(&self) -> &str;

    /// Whether speaking will produce sound
    fn is_available(&self) -> bool {
        true
    }

    /// Speak text, returning once playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if the engine fails to play the text
    async fn speak(&self, text: &str, settings: &TtsSettings) -> Result<()>;

    /// Voices the engine can use
    ///
    /// # Errors
    ///
    /// Returns error if the engine cannot be queried
    async fn voices(&self) -> Result<Vec<VoiceInfo>> {
        Ok(Vec::new())
    }
}

/// Engine used when voice output is disabled or no engine is installed
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentEngine;

#[async_trait]
impl SpeechEngine for SilentEngine {
    fn name(&self) -> &'static str {
        "silent"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn speak(&self, text: &str, _settings: &TtsSettings) -> Result<()> {
        tracing::debug!(chars = text.len(), "voice output unavailable, skipping speech");
        Ok(())
    }
}

/// Pick the speech engine for this configuration
#[must_use]
pub fn engine_from_config(config: &VoiceConfig) -> Arc<dyn SpeechEngine> {
    if !config.enabled {
        return Arc::new(SilentEngine);
    }

    match EspeakEngine::locate(config.engine_path.as_deref()) {
        Some(engine) => {
            tracing::info!(binary = %engine.binary().display(), "voice output via espeak");
            Arc::new(engine)
        }
        None => {
            tracing::warn!("no espeak-ng or espeak binary found, voice output disabled");
            Arc::new(SilentEngine)
        }
    }
}
