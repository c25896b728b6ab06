//! Configuration management for Chatterbox
//!
//! Precedence for every setting: environment > config file > default.
//! The LLM API key additionally checks `secrets.toml` before the config file.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::persona::Personality;
use crate::session::{DEFAULT_SESSION_IDLE, TtsSettings};

use self::file::{ChatterboxConfigFile, SecretsFile};

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Value shipped in sample configs; treated as "no key"
const PLACEHOLDER_KEY: &str = "YOUR_GEMINI_API_KEY";

/// Chatterbox configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Voice output configuration
    pub voice: VoiceConfig,

    /// Conversation behavior
    pub chat: ChatConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// LLM provider configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; `None` means degraded mode
    pub api_key: Option<SecretString>,

    /// Model identifier
    pub model: String,

    /// Cap on generated tokens per reply
    pub max_output_tokens: u32,

    /// API base URL (models collection)
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,
}

/// Voice output configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Voice output available at all
    pub enabled: bool,

    /// Speak replies in new sessions
    pub speak_by_default: bool,

    /// Explicit speech engine binary
    pub engine_path: Option<PathBuf>,

    /// Settings for new sessions
    pub defaults: TtsSettings,
}

/// Conversation behavior
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Personality for new sessions
    pub personality: Personality,

    /// Past turns included in the prompt
    pub history_window: usize,

    /// Sentences shown before "Continue reading"
    pub max_sentences: usize,

    /// Trim long replies in new sessions
    pub smart_read: bool,

    /// Idle time after which a session is discarded
    pub session_idle: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            personality: Personality::default(),
            history_window: 3,
            max_sentences: 3,
            smart_read: true,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    /// Built-in defaults only; no environment, no files, no API key
    fn default() -> Self {
        Self::resolve(
            &ChatterboxConfigFile::default(),
            &SecretsFile::default(),
            |_| None,
            false,
        )
    }
}

impl Config {
    /// Load configuration from the process environment and standard files
    #[must_use]
    pub fn load(disable_voice: bool) -> Self {
        let fc = file::load_config_file();
        let secrets = file::load_secrets_file();
        let config = Self::resolve(&fc, &secrets, |name| std::env::var(name).ok(), disable_voice);

        if disable_voice {
            tracing::info!("voice explicitly disabled via --disable-voice");
        }
        if config.llm.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not configured, running in degraded mode");
        }

        config
    }

    /// Merge sources into a configuration
    ///
    /// `env` looks up an environment variable by name.
    pub fn resolve<F>(
        fc: &ChatterboxConfigFile,
        secrets: &SecretsFile,
        env: F,
        disable_voice: bool,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // API key (env > secrets > toml > None)
        let api_key = env("GEMINI_API_KEY")
            .or_else(|| secrets.gemini_api_key.clone())
            .or_else(|| fc.llm.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_KEY)
            .map(SecretString::from);

        let llm = LlmConfig {
            api_key,
            model: env("CHATTERBOX_MODEL")
                .or_else(|| fc.llm.model.clone())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_output_tokens: env("CHATTERBOX_MAX_OUTPUT_TOKENS")
                .and_then(|s| s.parse().ok())
                .or(fc.llm.max_output_tokens)
                .unwrap_or(1024),
            base_url: env("CHATTERBOX_LLM_BASE_URL")
                .or_else(|| fc.llm.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(fc.llm.timeout_secs.unwrap_or(30)),
        };

        let voice = VoiceConfig {
            enabled: !disable_voice,
            speak_by_default: !disable_voice && fc.voice.speak_by_default.unwrap_or(false),
            engine_path: env("CHATTERBOX_TTS_ENGINE")
                .or_else(|| fc.voice.engine_path.clone())
                .map(PathBuf::from),
            defaults: TtsSettings::new(
                fc.voice.rate.unwrap_or(150),
                fc.voice.volume.unwrap_or(1.0),
                fc.voice.voice.clone(),
            ),
        };

        let personality = env("CHATTERBOX_PERSONALITY")
            .or_else(|| fc.chat.personality.clone())
            .and_then(|p| match p.parse() {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring configured personality");
                    None
                }
            })
            .unwrap_or_default();

        let defaults = ChatConfig::default();
        let chat = ChatConfig {
            personality,
            history_window: fc.chat.history_window.unwrap_or(defaults.history_window),
            max_sentences: fc.chat.max_sentences.unwrap_or(defaults.max_sentences),
            smart_read: fc.chat.smart_read.unwrap_or(defaults.smart_read),
            session_idle: fc
                .chat
                .session_idle_secs
                .map_or(defaults.session_idle, Duration::from_secs),
        };

        let server = ServerConfig {
            host: env("CHATTERBOX_HOST")
                .or_else(|| fc.server.host.clone())
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port: env("CHATTERBOX_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(8501),
        };

        Self {
            llm,
            voice,
            chat,
            server,
        }
    }
}
