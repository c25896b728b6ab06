//! Bot personalities
//!
//! A personality only decides the style instruction placed at the top of the
//! LLM prompt. Command handling never looks at it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Instruction shared by every personality
const BASE_INSTRUCTION: &str = "You are a helpful assistant.";

/// Communication style of the assistant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String")]
pub enum Personality {
    #[default]
    Friendly,
    Formal,
    Playful,
    Sarcastic,
    Teacher,
}

impl Personality {
    /// All personalities in display order
    pub const ALL: [Self; 5] = [
        Self::Friendly,
        Self::Formal,
        Self::Playful,
        Self::Sarcastic,
        Self::Teacher,
    ];

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Formal => "Formal",
            Self::Playful => "Playful",
            Self::Sarcastic => "Sarcastic",
            Self::Teacher => "Teacher",
        }
    }

    /// Style sentence appended to the base instruction
    #[must_use]
    pub const fn style(self) -> &'static str {
        match self {
            Self::Friendly => "Be friendly, clear, and encouraging.",
            Self::Formal => "Answer politely, concisely, and formally.",
            Self::Playful => "Be playful, use light humor and friendly tone.",
            Self::Sarcastic => "Use mild sarcasm and witty lines while staying helpful.",
            Self::Teacher => "Explain clearly with examples and simple language.",
        }
    }

    /// Full system instruction, optionally addressing the user by name
    #[must_use]
    pub fn instruction(self, username: Option<&str>) -> String {
        let mut instruction = format!("{BASE_INSTRUCTION} {}", self.style());
        if let Some(name) = username.map(str::trim).filter(|n| !n.is_empty()) {
            instruction.push_str(&format!(" Address the user as {name} when appropriate."));
        }
        instruction
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Personality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Config(format!("unknown personality: {wanted}")))
    }
}

impl TryFrom<String> for Personality {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("formal".parse::<Personality>().unwrap(), Personality::Formal);
        assert_eq!(" SARCASTIC ".parse::<Personality>().unwrap(), Personality::Sarcastic);
        assert!("grumpy".parse::<Personality>().is_err());
    }

    #[test]
    fn deserializes_case_insensitively() {
        let p: Personality = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(p, Personality::Teacher);
        assert!(serde_json::from_str::<Personality>("\"grumpy\"").is_err());
        assert_eq!(serde_json::to_string(&Personality::Teacher).unwrap(), "\"Teacher\"");
    }

    #[test]
    fn every_instruction_starts_with_base() {
        for p in Personality::ALL {
            let instruction = p.instruction(None);
            assert!(instruction.starts_with(BASE_INSTRUCTION));
            assert!(instruction.ends_with(p.style()));
        }
    }

    #[test]
    fn instruction_addresses_named_user() {
        let instruction = Personality::Playful.instruction(Some("Kaif"));
        assert!(instruction.ends_with("Address the user as Kaif when appropriate."));

        let blank = Personality::Playful.instruction(Some("   "));
        assert!(!blank.contains("Address the user"));
    }

    #[test]
    fn default_is_friendly() {
        assert_eq!(Personality::default(), Personality::Friendly);
    }
}
