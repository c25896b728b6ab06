//! Error types for Chatterbox

use thiserror::Error;

/// Result type alias for Chatterbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Chatterbox
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM provider error (request failed, bad status, empty answer)
    #[error("llm error: {0}")]
    Llm(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Session does not exist (never created or already ended)
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
