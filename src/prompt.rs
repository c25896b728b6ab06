//! Prompt builder: personality instruction, recent turns, then the new message
//!
//! ```text
//! You are a helpful assistant. Be friendly, clear, and encouraging.
//! Conversation:
//! User: hi
//! Assistant: Hello!
//! User: what's new?
//! Assistant:
//! ```

use crate::persona::Personality;
use crate::session::Turn;

/// Speaker label for user lines
const USER_LABEL: &str = "User";
/// Speaker label for assistant lines
const ASSISTANT_LABEL: &str = "Assistant";

/// Build the full prompt for one LLM call
///
/// Chat turns contribute their untrimmed answer. Continuation turns have no
/// user line.
#[must_use]
pub fn build_prompt(
    personality: Personality,
    username: Option<&str>,
    history: &[Turn],
    message: &str,
) -> String {
    let mut lines = vec![personality.instruction(username), "Conversation:".to_string()];

    for turn in history {
        if !turn.user_text().is_empty() {
            lines.push(format!("{USER_LABEL}: {}", turn.user_text()));
        }
        let answer = turn.full_response().unwrap_or_else(|| turn.response());
        lines.push(format!("{ASSISTANT_LABEL}: {answer}"));
    }

    lines.push(format!("{USER_LABEL}: {message}"));
    lines.push(format!("{ASSISTANT_LABEL}:"));
    lines.join("\n")
}
