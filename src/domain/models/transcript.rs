use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }

    /// Label shown in front of a turn when the transcript is rendered.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Bot => "Bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
        }
    }
}

/// Append-only log of the turns of one chat session.
///
/// Turns can be pushed and read but never removed or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatTranscript {
    turns: Vec<Turn>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_turns_in_insertion_order() {
        let mut transcript = ChatTranscript::new();
        transcript.push(Turn::user("hello"));
        transcript.push(Turn::bot("{}"));
        transcript.push(Turn::user("again"));

        let roles: Vec<Role> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Bot, Role::User]);
        assert_eq!(transcript.last().unwrap().text, "again");
    }

    #[test]
    fn serializes_roles_in_lowercase() {
        let mut transcript = ChatTranscript::new();
        transcript.push(Turn::user("hi"));
        let json = serde_json::to_value(&transcript).unwrap();
        assert_eq!(json, serde_json::json!([{"role": "user", "text": "hi"}]));
    }

    #[test]
    fn render_prefixes_each_turn() {
        let mut transcript = ChatTranscript::new();
        transcript.push(Turn::user("hi"));
        transcript.push(Turn::bot("ok"));
        assert_eq!(transcript.render(), "You: hi\nBot: ok");
    }
}
