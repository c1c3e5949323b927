use async_trait::async_trait;
use serde_json::json;

use crate::application::ChatClient;
use crate::domain::DomainError;

const MONTHS: &[(&str, &str)] = &[
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

enum Mode {
    RuleBased,
    Fixed(String),
    Failing(String),
}

/// Offline [`ChatClient`] for demos and tests.
///
/// The default mode answers the extraction prompt with simple keyword rules
/// so the whole pipeline runs without network access. Tests can pin the
/// reply text or make every call fail.
pub struct MockChatClient {
    mode: Mode,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            mode: Mode::RuleBased,
        }
    }

    /// Always answer with `reply`, whatever the prompt.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            mode: Mode::Fixed(reply.into()),
        }
    }

    /// Fail every call with a model error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            mode: Mode::Failing(message.into()),
        }
    }

    fn rule_based_reply(prompt: &str) -> String {
        let message = user_message(prompt);
        let lower = message.to_lowercase();

        let version = if lower.contains("plan year 1") {
            "Plan Year 1"
        } else if lower.contains("plan year 2") {
            "Plan Year 2"
        } else {
            ""
        };

        let words: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric() && c != '.')
            .map(|w| w.trim_matches('.').to_string())
            .filter(|w| !w.is_empty())
            .collect();

        let month = words
            .iter()
            .find_map(|w| month_name(w))
            .unwrap_or_default();

        let measure = if words.iter().any(|w| w == "headcount") {
            "Headcount"
        } else {
            ""
        };

        let value = words
            .iter()
            .rev()
            .find(|w| w.chars().any(|c| c.is_ascii_digit()) && w.parse::<f64>().is_ok())
            .cloned()
            .unwrap_or_default();

        json!({
            "version": version,
            "month": month,
            "measure": measure,
            "value": value,
        })
        .to_string()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The quoted message on the last `User: "..."` line of the prompt, or the
/// whole prompt when there is no such line.
fn user_message(prompt: &str) -> &str {
    let Some(start) = prompt.rfind("User: \"") else {
        return prompt;
    };
    let rest = &prompt[start + "User: \"".len()..];
    match rest.rfind('"') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

fn month_name(word: &str) -> Option<&'static str> {
    if word.len() < 3 {
        return None;
    }
    MONTHS.iter().find_map(|(abbr, full)| {
        let full_lower = full.to_lowercase();
        // Accepts "mar", "march", "sept" and other prefixes of the full name.
        (word.starts_with(abbr) && full_lower.starts_with(word)).then_some(*full)
    })
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        match &self.mode {
            Mode::RuleBased => Ok(Self::rule_based_reply(prompt)),
            Mode::Fixed(reply) => Ok(reply.clone()),
            Mode::Failing(message) => Err(DomainError::model(format!(
                "MockChatClient: {message}"
            ))),
        }
    }

    fn model_name(&self) -> &str {
        match self.mode {
            Mode::RuleBased => "mock-rules",
            Mode::Fixed(_) => "mock-fixed",
            Mode::Failing(_) => "mock-failing",
        }
    }
}
