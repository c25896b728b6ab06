//! Turn processor: turns one raw user input into a displayed and spoken reply
//!
//! ```text
//! input ─▶ slash command? ──yes──▶ fixed/computed reply ───────────────┐
//!              │ no                                                    │
//!              ▼                                                       ▼
//!        build prompt ─▶ LLM ─▶ smart trim ─▶ append turn ─▶ speak ─▶ reply
//!                         │ unavailable / error
//!                         └─▶ warning text (turn still appended)
//! ```
//!
//! LLM problems never escape this module; they become warning replies and the
//! session stays usable.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::command::SlashCommand;
use crate::config::ChatConfig;
use crate::llm::{DEGRADED_WARNING, LlmClient, offline};
use crate::prompt::build_prompt;
use crate::session::{Session, Turn, TurnKind};
use crate::text::{SmartRead, smart_trim, suggestions};
use crate::voice::SpeechEngine;

/// Source of "now" for `/time`, `/date` and offline answers
pub type Clock = fn() -> DateTime<Local>;

/// What the UI shows for one processed input
#[derive(Debug, Clone, Serialize)]
pub struct TurnReply {
    /// What produced the reply
    pub kind: TurnKind,
    /// Reply text as displayed
    pub text: String,
    /// "Continue reading" has something to reveal
    pub has_more: bool,
    /// Follow-up prompts; empty for commands and continuations
    pub suggestions: Vec<&'static str>,
    /// Reply was played through the speech engine
    pub spoken: bool,
}

/// Runs the conversation-turn pipeline against a session
pub struct TurnProcessor {
    llm: Option<Arc<dyn LlmClient>>,
    speech: Arc<dyn SpeechEngine>,
    history_window: usize,
    max_sentences: usize,
    clock: Clock,
}

impl TurnProcessor {
    /// Create a processor; `llm: None` runs in degraded mode
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmClient>>, speech: Arc<dyn SpeechEngine>) -> Self {
        let defaults = ChatConfig::default();
        Self {
            llm,
            speech,
            history_window: defaults.history_window,
            max_sentences: defaults.max_sentences,
            clock: Local::now,
        }
    }

    /// Apply history and trimming limits from configuration
    #[must_use]
    pub fn chat_config(mut self, config: &ChatConfig) -> Self {
        self.history_window = config.history_window;
        self.max_sentences = config.max_sentences;
        self
    }

    /// Replace the clock
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Whether an LLM client is configured
    #[must_use]
    pub fn llm_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Name of the configured LLM, if any
    #[must_use]
    pub fn llm_name(&self) -> Option<&str> {
        self.llm.as_deref().map(|llm| llm.name())
    }

    /// The speech engine replies are sent to
    #[must_use]
    pub fn speech(&self) -> &Arc<dyn SpeechEngine> {
        &self.speech
    }

    /// Process one user input
    ///
    /// Returns `None` for blank input, which produces no turn.
    pub async fn process(&self, session: &mut Session, input: &str) -> Option<TurnReply> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(command) = SlashCommand::parse(text) {
            return Some(self.run_command(session, text, &command));
        }

        let prompt = build_prompt(
            session.personality(),
            session.username(),
            session.recent(self.history_window),
            text,
        );

        let (kind, shown, has_more) = match &self.llm {
            None => {
                tracing::debug!(session_id = %session.id(), "no LLM configured, degraded reply");
                session.push_turn(Turn::new(TurnKind::Degraded, text, DEGRADED_WARNING));
                (TurnKind::Degraded, DEGRADED_WARNING.to_string(), false)
            }
            Some(llm) => match llm.generate(&prompt).await {
                Ok(answer) => {
                    let read = if session.smart_read() {
                        smart_trim(&answer, self.max_sentences)
                    } else {
                        SmartRead::whole(&answer)
                    };
                    let has_more = read.remainder.is_some();
                    tracing::info!(
                        session_id = %session.id(),
                        personality = %session.personality(),
                        chars = answer.len(),
                        has_more,
                        "chat turn answered"
                    );
                    let turn = Turn::new(TurnKind::Chat, text, read.short.clone())
                        .with_full_response(answer);
                    session.push_trimmed_turn(turn, read.remainder);
                    (TurnKind::Chat, read.short, has_more)
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session.id(),
                        llm = llm.name(),
                        error = %e,
                        "LLM call failed, answering offline"
                    );
                    let warning = format!(
                        "⚠️ {e}. (Falling back offline.)\n\n{}",
                        offline::fallback_answer(text, &(self.clock)())
                    );
                    session.push_turn(Turn::new(TurnKind::Degraded, text, warning.clone()));
                    (TurnKind::Degraded, warning, false)
                }
            },
        };

        let spoken = self.speak(session, &shown).await;

        Some(TurnReply {
            kind,
            text: shown,
            has_more,
            suggestions: suggestions(text).to_vec(),
            spoken,
        })
    }

    /// Reveal the rest of the last trimmed answer
    ///
    /// Returns `None` when nothing is held back.
    pub async fn continue_reading(&self, session: &mut Session) -> Option<TurnReply> {
        let remainder = session.take_remainder()?;
        session.push_turn(Turn::new(TurnKind::Continuation, "", remainder.clone()));
        let spoken = self.speak(session, &remainder).await;

        Some(TurnReply {
            kind: TurnKind::Continuation,
            text: remainder,
            has_more: false,
            suggestions: Vec::new(),
            spoken,
        })
    }

    fn run_command(&self, session: &mut Session, text: &str, command: &SlashCommand) -> TurnReply {
        if *command == SlashCommand::Clear {
            session.clear();
        }

        let reply = command.reply(&(self.clock)());
        tracing::info!(
            session_id = %session.id(),
            command = %text,
            known = command.is_known(),
            "slash command"
        );
        session.push_turn(Turn::new(TurnKind::Command, text, reply.clone()));

        TurnReply {
            kind: TurnKind::Command,
            text: reply,
            has_more: false,
            suggestions: Vec::new(),
            spoken: false,
        }
    }

    /// Speak if the session wants voice; failures are logged, not returned
    async fn speak(&self, session: &Session, text: &str) -> bool {
        if !session.voice_enabled() || !self.speech.is_available() {
            return false;
        }

        match self.speech.speak(text, session.tts()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    session_id = %session.id(),
                    engine = self.speech.name(),
                    error = %e,
                    "TTS failed"
                );
                false
            }
        }
    }
}
