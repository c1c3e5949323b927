use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::ChatClient;
use crate::domain::{parse_reply, DomainError, ExtractedParameters, ReplyParse};

/// Instruction text sent ahead of every user message.
const EXTRACTION_TEMPLATE: &str = r#"
Extract structured parameters for a Dialogflow webhook.

Return ONLY valid JSON like this:

{
  "version": "",
  "month": "",
  "measure": "",
  "value": ""
}

Rules:
- version: Plan Year 1 , Plan Year 2
- month: Jan–Dec or full month names
- measure: Headcount
- value: Numeric only
- If missing info, infer from context or leave empty.

User: "{user_message}"
"#;

/// Fill the extraction template with the raw user message.
pub fn build_extraction_prompt(user_message: &str) -> String {
    EXTRACTION_TEMPLATE.replace("{user_message}", user_message)
}

/// What to do when the reply holds a `{ ... }` span that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedReplyPolicy {
    /// Surface [`DomainError::MalformedReply`].
    #[default]
    Fail,
    /// Log and continue with the all-empty record.
    Empty,
}

impl MalformedReplyPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MalformedReplyPolicy::Fail => "fail",
            MalformedReplyPolicy::Empty => "empty",
        }
    }
}

impl fmt::Display for MalformedReplyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MalformedReplyPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(MalformedReplyPolicy::Fail),
            "empty" => Ok(MalformedReplyPolicy::Empty),
            other => Err(DomainError::invalid_input(format!(
                "unknown malformed-reply policy '{other}' (expected 'fail' or 'empty')"
            ))),
        }
    }
}

/// Turns one free-text message into [`ExtractedParameters`] via the model.
///
/// Each call is independent: only the current message goes into the prompt.
pub struct ExtractParametersUseCase {
    chat_client: Arc<dyn ChatClient>,
    malformed_policy: MalformedReplyPolicy,
}

impl ExtractParametersUseCase {
    pub fn new(chat_client: Arc<dyn ChatClient>) -> Self {
        Self {
            chat_client,
            malformed_policy: MalformedReplyPolicy::default(),
        }
    }

    pub fn with_malformed_policy(mut self, policy: MalformedReplyPolicy) -> Self {
        self.malformed_policy = policy;
        self
    }

    pub async fn execute(&self, message: &str) -> Result<ExtractedParameters, DomainError> {
        info!(
            "Extracting parameters with {} ({} chars)",
            self.chat_client.model_name(),
            message.chars().count()
        );

        let prompt = build_extraction_prompt(message);
        let reply = self.chat_client.complete(&prompt).await?;
        debug!("Model reply: {}", reply);

        match parse_reply(&reply) {
            ReplyParse::FullDocument(params) => Ok(params),
            ReplyParse::Substring(params) => {
                debug!("Reply was not a bare JSON object; used the embedded {{...}} span");
                Ok(params)
            }
            ReplyParse::NoCandidate => {
                warn!("Model reply contained no JSON object; using empty parameters");
                Ok(ExtractedParameters::empty())
            }
            ReplyParse::Malformed { candidate, reason } => match self.malformed_policy {
                MalformedReplyPolicy::Fail => Err(DomainError::malformed_reply(format!(
                    "{reason}: {candidate}"
                ))),
                MalformedReplyPolicy::Empty => {
                    warn!("Malformed JSON in model reply ({reason}); using empty parameters");
                    Ok(ExtractedParameters::empty())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockChatClient;

    fn use_case(reply: &str) -> ExtractParametersUseCase {
        ExtractParametersUseCase::new(Arc::new(MockChatClient::with_reply(reply)))
    }

    #[test]
    fn prompt_quotes_the_user_message() {
        let prompt = build_extraction_prompt("Set March to 120");
        assert!(prompt.contains(r#"User: "Set March to 120""#));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(!prompt.contains("{user_message}"));
    }

    #[tokio::test]
    async fn returns_fields_verbatim() {
        let params = use_case(
            r#"{"version":"Plan Year 1","month":"March","measure":"Headcount","value":"120"}"#,
        )
        .execute("Set Plan Year 1 headcount for March to 120")
        .await
        .unwrap();

        assert_eq!(
            params,
            ExtractedParameters::new("Plan Year 1", "March", "Headcount", "120")
        );
    }

    #[tokio::test]
    async fn prose_reply_yields_empty_record() {
        let params = use_case("Hello! How can I help you today?")
            .execute("hello")
            .await
            .unwrap();
        assert_eq!(params, ExtractedParameters::empty());
    }

    #[tokio::test]
    async fn malformed_reply_fails_by_default() {
        let err = use_case("{version: 'Plan Year 1'}")
            .execute("anything")
            .await
            .unwrap_err();
        assert!(err.is_malformed_reply());
    }

    #[tokio::test]
    async fn malformed_reply_can_default_to_empty() {
        let params = use_case("{version: 'Plan Year 1'}")
            .with_malformed_policy(MalformedReplyPolicy::Empty)
            .execute("anything")
            .await
            .unwrap();
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        let client = Arc::new(MockChatClient::failing("connection refused"));
        let err = ExtractParametersUseCase::new(client)
            .execute("anything")
            .await
            .unwrap_err();
        assert!(err.is_model_error());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("EMPTY".parse::<MalformedReplyPolicy>().unwrap(), MalformedReplyPolicy::Empty);
        assert_eq!("fail".parse::<MalformedReplyPolicy>().unwrap(), MalformedReplyPolicy::Fail);
        assert!("ignore".parse::<MalformedReplyPolicy>().is_err());
    }
}
