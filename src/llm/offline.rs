//! Canned answers used when an LLM call fails mid-session

use chrono::{DateTime, TimeZone};

use crate::command::format_date;

/// Pick a small offline answer for the user's text
#[must_use]
pub fn fallback_answer<Tz>(user_text: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let p = user_text.trim().to_lowercase();
    if matches!(p.as_str(), "hi" | "hello" | "hey") {
        return "Hi! I'm offline right now, but I can still answer a few simple questions. \
                Try /time or /date."
            .to_string();
    }
    if p.contains("time") {
        return "I can't fetch external data offline, but /time shows your local clock.".to_string();
    }
    if p.contains("date") {
        return format_date(now);
    }
    if p.contains("joke") {
        return "Why did the programmer quit his job? Because he didn't get arrays (a raise)."
            .to_string();
    }
    "Sorry, I can't reach the assistant right now. Try again later.".to_string()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn answers_by_keyword() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();

        assert!(fallback_answer("Hello", &now).starts_with("Hi!"));
        assert!(fallback_answer("what time is it", &now).contains("/time"));
        assert_eq!(fallback_answer("today's date?", &now), "Sunday, October 18, 2026");
        assert!(fallback_answer("tell me a joke", &now).contains("arrays"));
        assert!(fallback_answer("explain monads", &now).starts_with("Sorry"));
    }
}
