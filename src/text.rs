//! Reply post-processing: smart-read trimming and follow-up suggestions

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Sentence boundary: terminal punctuation followed by whitespace
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Marker appended to a trimmed reply
pub const ELLIPSIS: &str = " ...";

/// A reply split into what is shown now and what "Continue reading" reveals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmartRead {
    /// Text to display and speak now
    pub short: String,
    /// Rest of the reply, if anything was cut
    pub remainder: Option<String>,
}

impl SmartRead {
    /// The whole text, nothing held back
    #[must_use]
    pub fn whole(text: &str) -> Self {
        Self {
            short: text.to_string(),
            remainder: None,
        }
    }
}

/// Split text into sentences, dropping the whitespace between them
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // punctuation is a single ASCII byte
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Keep the first `max_sentences` sentences, hold the rest back
///
/// Text with at most `max_sentences` sentences is returned whole.
#[must_use]
pub fn smart_trim(text: &str, max_sentences: usize) -> SmartRead {
    let max_sentences = max_sentences.max(1);
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return SmartRead::whole(text);
    }

    let (head, tail) = sentences.split_at(max_sentences);
    SmartRead {
        short: format!("{}{ELLIPSIS}", head.join(" ")),
        remainder: Some(tail.join(" ")),
    }
}

/// Three follow-up prompts matched to what the user asked about
#[must_use]
pub fn suggestions(user_text: &str) -> [&'static str; 3] {
    let lower = user_text.to_lowercase();
    if lower.contains("weather") {
        ["Tomorrow's forecast", "Weekly summary", "Humidity details"]
    } else if lower.contains("joke") || lower.contains("fun") {
        ["Another joke", "Short pun", "Clean joke"]
    } else {
        ["Explain simply", "Give an example", "Summarize in 2 lines"]
    }
}

/// A canned prompt offered as a one-click button
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

/// Quick actions shown above the input box
pub const QUICK_ACTIONS: [QuickAction; 4] = [
    QuickAction { label: "☁ Weather (Delhi)", prompt: "weather Delhi" },
    QuickAction { label: "😂 Joke", prompt: "tell me a joke" },
    QuickAction { label: "💡 Quote", prompt: "inspirational quote" },
    QuickAction { label: "📰 News (top)", prompt: "latest news headlines" },
];
