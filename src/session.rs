//! Conversation sessions
//!
//! A [`Session`] is created when a UI session starts, emptied by `/clear`,
//! and dropped when the UI session ends. Nothing is written to disk.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::persona::Personality;
use crate::{Config, Error, Result};

/// Shortest allowed speaking rate (words per minute)
pub const MIN_RATE: u32 = 80;
/// Longest allowed speaking rate (words per minute)
pub const MAX_RATE: u32 = 260;
/// Quietest allowed volume
pub const MIN_VOLUME: f32 = 0.1;
/// Loudest allowed volume
pub const MAX_VOLUME: f32 = 1.0;

/// Greeting shown before the first turn
pub const GREETING: &str = "Hello! I'm your assistant. Ask me anything and pick a personality \
     in the settings. Try /help to see commands.";

/// Speech output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtsSettings {
    /// Speaking rate in words per minute
    pub rate: u32,
    /// Output volume, 0.1 to 1.0
    pub volume: f32,
    /// Engine voice identifier; `None` uses the engine default
    pub voice_id: Option<String>,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            rate: 150,
            volume: 1.0,
            voice_id: None,
        }
    }
}

impl TtsSettings {
    /// Build settings, clamping rate and volume into range
    #[must_use]
    pub fn new(rate: u32, volume: f32, voice_id: Option<String>) -> Self {
        Self {
            rate: rate.clamp(MIN_RATE, MAX_RATE),
            volume: if volume.is_nan() {
                MAX_VOLUME
            } else {
                volume.clamp(MIN_VOLUME, MAX_VOLUME)
            },
            voice_id: voice_id.filter(|v| !v.trim().is_empty()),
        }
    }
}

/// What produced a turn's response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Slash command, LLM skipped
    Command,
    /// LLM answer
    Chat,
    /// Warning produced because the LLM was unavailable or failed
    Degraded,
    /// Remainder revealed by "Continue reading"
    Continuation,
}

/// One user-input/response exchange. Never modified after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Turn {
    kind: TurnKind,
    user_text: String,
    response: String,
    full_response: Option<String>,
    timestamp: DateTime<Local>,
}

impl Turn {
    /// Create a turn stamped with the current local time
    #[must_use]
    pub fn new(kind: TurnKind, user_text: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            kind,
            user_text: user_text.into(),
            response: response.into(),
            full_response: None,
            timestamp: Local::now(),
        }
    }

    /// Attach the untrimmed LLM answer
    #[must_use]
    pub fn with_full_response(mut self, full: impl Into<String>) -> Self {
        self.full_response = Some(full.into());
        self
    }

    #[must_use]
    pub const fn kind(&self) -> TurnKind {
        self.kind
    }

    #[must_use]
    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    /// Response as displayed (possibly trimmed)
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Untrimmed LLM answer, for chat turns
    #[must_use]
    pub fn full_response(&self) -> Option<&str> {
        self.full_response.as_deref()
    }

    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Partial update of session settings; absent fields stay as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub personality: Option<Personality>,
    pub username: Option<String>,
    pub voice_enabled: Option<bool>,
    pub smart_read: Option<bool>,
    pub rate: Option<u32>,
    pub volume: Option<f32>,
    /// `Some("")` resets to the engine default voice
    pub voice_id: Option<String>,
}

/// State of one UI session
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    created_at: DateTime<Local>,
    turns: Vec<Turn>,
    personality: Personality,
    username: Option<String>,
    tts: TtsSettings,
    voice_enabled: bool,
    smart_read: bool,
    pending_remainder: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start an empty session with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Local::now(),
            turns: Vec::new(),
            personality: Personality::default(),
            username: None,
            tts: TtsSettings::default(),
            voice_enabled: false,
            smart_read: true,
            pending_remainder: None,
        }
    }

    /// Start an empty session using configured defaults
    #[must_use]
    pub fn configured(config: &Config) -> Self {
        Self {
            personality: config.chat.personality,
            tts: config.voice.defaults.clone(),
            voice_enabled: config.voice.speak_by_default,
            smart_read: config.chat.smart_read,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Turns in the order they happened
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The last `n` turns
    #[must_use]
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    #[must_use]
    pub const fn personality(&self) -> Personality {
        self.personality
    }

    pub const fn set_personality(&mut self, personality: Personality) {
        self.personality = personality;
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn set_username(&mut self, name: Option<String>) {
        self.username = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }

    #[must_use]
    pub const fn tts(&self) -> &TtsSettings {
        &self.tts
    }

    pub fn set_tts(&mut self, tts: TtsSettings) {
        self.tts = tts;
    }

    #[must_use]
    pub const fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub const fn set_voice_enabled(&mut self, enabled: bool) {
        self.voice_enabled = enabled;
    }

    #[must_use]
    pub const fn smart_read(&self) -> bool {
        self.smart_read
    }

    pub const fn set_smart_read(&mut self, enabled: bool) {
        self.smart_read = enabled;
    }

    /// Text "Continue reading" would reveal, if any
    #[must_use]
    pub fn pending_remainder(&self) -> Option<&str> {
        self.pending_remainder.as_deref()
    }

    /// Append a turn; any held-back remainder is dropped
    pub fn push_turn(&mut self, turn: Turn) {
        self.pending_remainder = None;
        self.turns.push(turn);
    }

    /// Append a trimmed chat turn and hold back its remainder
    pub fn push_trimmed_turn(&mut self, turn: Turn, remainder: Option<String>) {
        self.push_turn(turn);
        self.pending_remainder = remainder;
    }

    /// Take the held-back remainder, leaving none
    pub const fn take_remainder(&mut self) -> Option<String> {
        self.pending_remainder.take()
    }

    /// Forget all turns; settings are kept
    pub fn clear(&mut self) {
        self.turns.clear();
        self.pending_remainder = None;
    }

    /// Apply a partial settings update
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(personality) = update.personality {
            self.personality = personality;
        }
        if let Some(name) = update.username {
            self.set_username(Some(name));
        }
        if let Some(enabled) = update.voice_enabled {
            self.voice_enabled = enabled;
        }
        if let Some(enabled) = update.smart_read {
            self.smart_read = enabled;
        }

        let voice_id = match update.voice_id {
            Some(v) => Some(v),
            None => self.tts.voice_id.clone(),
        };
        self.tts = TtsSettings::new(
            update.rate.unwrap_or(self.tts.rate),
            update.volume.unwrap_or(self.tts.volume),
            voice_id,
        );
    }
}

/// A session shared between requests of the same UI session
pub type SharedSession = Arc<Mutex<Session>>;

/// Idle time after which a session is discarded
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(30 * 60);

struct StoredSession {
    session: SharedSession,
    last_active: Instant,
}

/// In-memory registry of live sessions
///
/// Sessions untouched for longer than the idle timeout are swept on every
/// `create` and `get`, so tabs closed without ending their session do not
/// accumulate.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout,
        }
    }

    /// Register a fresh session and return its id
    pub async fn create(&self, session: Session) -> String {
        let id = session.id().to_string();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        sessions.insert(
            id.clone(),
            StoredSession {
                session: Arc::new(Mutex::new(session)),
                last_active: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, live = sessions.len(), "session started");
        id
    }

    /// Look up a live session and mark it active
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the id is unknown or the session expired
    pub async fn get(&self, id: &str) -> Result<SharedSession> {
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions);
        let stored = sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        stored.last_active = Instant::now();
        Ok(stored.session.clone())
    }

    /// End a session, discarding its history
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the id is unknown
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| tracing::debug!(session_id = %id, "session ended"))
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn sweep(&self, sessions: &mut HashMap<String, StoredSession>) {
        let before = sessions.len();
        sessions.retain(|_, stored| stored.last_active.elapsed() <= self.idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::info!(expired, live = sessions.len(), "discarded idle sessions");
        }
    }
}
