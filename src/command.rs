//! Slash commands
//!
//! Input starting with `/` never reaches the LLM. The command set is fixed;
//! anything else with a leading slash gets the "unknown command" reply.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Reply for `/`-prefixed input that matches no command
pub const UNKNOWN_COMMAND_REPLY: &str = "Unknown command. Try /help.";

/// Reply for `/clear`
pub const CLEAR_REPLY: &str = "Conversation cleared (session).";

/// Reply for `/about`
pub const ABOUT_REPLY: &str = "✨ Chatterbox Text+Voice ChatBot, Gemini-powered (optional). \
     Features: personalities, smart read, voice output.";

/// Description of a built-in command, for help output and the UI
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CommandInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Every supported command in help order
pub const COMMANDS: [CommandInfo; 5] = [
    CommandInfo { name: "/help", description: "show this help" },
    CommandInfo { name: "/clear", description: "clear conversation (session)" },
    CommandInfo { name: "/time", description: "current time" },
    CommandInfo { name: "/date", description: "current date" },
    CommandInfo { name: "/about", description: "about this bot" },
];

/// A parsed slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Help,
    Clear,
    Time,
    Date,
    About,
    /// Leading slash but not a known command; holds the normalized input
    Unknown(String),
}

impl SlashCommand {
    /// Parse user input. Returns `None` when the input is not a command.
    ///
    /// Matching is on the whole trimmed input, case-insensitive, so
    /// `/help me` is unknown.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        if !normalized.starts_with('/') {
            return None;
        }

        Some(match normalized.as_str() {
            "/help" => Self::Help,
            "/clear" => Self::Clear,
            "/time" => Self::Time,
            "/date" => Self::Date,
            "/about" => Self::About,
            _ => Self::Unknown(normalized),
        })
    }

    /// Whether the command was recognized
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Reply text for this command at the given instant
    ///
    /// `/clear` only produces its confirmation here; emptying the history is
    /// the caller's job.
    #[must_use]
    pub fn reply<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            Self::Help => help_text(),
            Self::Clear => CLEAR_REPLY.to_string(),
            Self::Time => format!("🕒 Current time: {}", now.format("%H:%M:%S")),
            Self::Date => format!("📅 {}", format_date(now)),
            Self::About => ABOUT_REPLY.to_string(),
            Self::Unknown(_) => UNKNOWN_COMMAND_REPLY.to_string(),
        }
    }
}

/// Long-form date, e.g. `Sunday, October 18, 2026`
#[must_use]
pub fn format_date<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %d, %Y").to_string()
}

fn help_text() -> String {
    let lines: Vec<String> = COMMANDS
        .iter()
        .map(|c| format!("- {} - {}", c.name, c.description))
        .collect();
    format!("**Pro Commands**\n{}", lines.join("\n"))
}
