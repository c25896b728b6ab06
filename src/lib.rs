//! Chatterbox - text and voice chatbot
//!
//! This library provides the core functionality for Chatterbox:
//! - Slash commands answered locally
//! - Personality-prefixed prompts sent to an LLM (Gemini)
//! - Smart-read trimming with "continue reading"
//! - Spoken replies through a local TTS engine
//! - Graceful degraded mode when no LLM is reachable
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │        Web UI (axum)        │     Terminal chat      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Turn Processor                       │
//! │  Commands  │  Prompt  │  Smart read  │  Session     │
//! └──────────┬─────────────────────────────┬────────────┘
//!            │                             │
//! ┌──────────▼──────────┐       ┌──────────▼──────────┐
//! │   LLM (Gemini)      │       │  Speech (espeak-ng) │
//! └─────────────────────┘       └─────────────────────┘
//! ```

pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod text;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use llm::{GeminiClient, LlmClient};
pub use persona::Personality;
pub use pipeline::{TurnProcessor, TurnReply};
pub use session::{Session, SessionStore, Turn, TurnKind, TtsSettings};
pub use voice::{EspeakEngine, SilentEngine, SpeechEngine};
