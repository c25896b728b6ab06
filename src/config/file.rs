//! TOML configuration and secrets file loading
//!
//! Supports `~/.config/chatterbox/config.toml` as a persistent config source
//! and `~/.config/chatterbox/secrets.toml` for the LLM API key.
//! All fields are optional; each file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ChatterboxConfigFile {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Conversation behavior
    #[serde(default)]
    pub chat: ChatFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// LLM-related configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// API key (prefer secrets.toml or the environment)
    pub api_key: Option<String>,

    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: Option<String>,

    /// Cap on generated tokens per reply
    pub max_output_tokens: Option<u32>,

    /// Override for the API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Voice output configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Speak replies in new sessions
    pub speak_by_default: Option<bool>,

    /// Path to the espeak-ng (or espeak) binary
    pub engine_path: Option<String>,

    /// Default speaking rate (words per minute)
    pub rate: Option<u32>,

    /// Default volume (0.1 to 1.0)
    pub volume: Option<f32>,

    /// Default voice identifier
    pub voice: Option<String>,
}

/// Conversation behavior
#[derive(Debug, Default, Deserialize)]
pub struct ChatFileConfig {
    /// Personality for new sessions
    pub personality: Option<String>,

    /// Number of past turns included in the prompt
    pub history_window: Option<usize>,

    /// Sentences shown before "Continue reading"
    pub max_sentences: Option<usize>,

    /// Trim long replies in new sessions
    pub smart_read: Option<bool>,

    /// Seconds without activity before a session is discarded
    pub session_idle_secs: Option<u64>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind
    pub host: Option<String>,

    /// Port to listen on
    pub port: Option<u16>,
}

/// Secrets file schema (`GEMINI_API_KEY = "..."`)
#[derive(Debug, Default, Deserialize)]
pub struct SecretsFile {
    #[serde(rename = "GEMINI_API_KEY")]
    pub gemini_api_key: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ChatterboxConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ChatterboxConfigFile {
    config_dir().map_or_else(ChatterboxConfigFile::default, |dir| {
        load_toml_or_default(&dir.join("config.toml"))
    })
}

/// Load the secrets file
///
/// `CHATTERBOX_SECRETS` overrides the standard path.
pub fn load_secrets_file() -> SecretsFile {
    load_secrets_from(std::env::var_os("CHATTERBOX_SECRETS").map(PathBuf::from))
}

/// Load secrets from `override_path`, or the standard path when `None`
pub fn load_secrets_from(override_path: Option<PathBuf>) -> SecretsFile {
    override_path
        .or_else(|| config_dir().map(|d| d.join("secrets.toml")))
        .map_or_else(SecretsFile::default, |p| load_toml_or_default(&p))
}

/// Parse a TOML file, falling back to defaults on any problem
pub fn load_toml_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return T::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(parsed) => {
                tracing::info!(path = %path.display(), "loaded config file");
                parsed
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                T::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            T::default()
        }
    }
}

/// Return the config directory: `~/.config/chatterbox`
pub fn config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("chatterbox"))
}
