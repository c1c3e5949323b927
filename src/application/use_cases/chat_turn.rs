use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{ChatTranscript, DomainError, ExtractedParameters, Turn};

use super::{ExtractParametersUseCase, ForwardIntentUseCase};

/// Step a turn is currently in, reported to progress observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Extracting,
    Forwarding,
}

impl TurnStage {
    pub fn message(&self) -> &'static str {
        match self {
            TurnStage::Extracting => "Extracting parameters...",
            TurnStage::Forwarding => "Sending to webhook...",
        }
    }
}

/// Result of one successful chat interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub parameters: ExtractedParameters,
    pub response: Value,
}

/// Runs one user interaction against an owned transcript.
///
/// The transcript is moved in and handed back so the caller stays its only
/// owner. The user turn is always appended; the bot turn only on success.
pub struct ChatTurnUseCase {
    extract: ExtractParametersUseCase,
    forward: ForwardIntentUseCase,
}

impl ChatTurnUseCase {
    pub fn new(extract: ExtractParametersUseCase, forward: ForwardIntentUseCase) -> Self {
        Self { extract, forward }
    }

    pub async fn execute(
        &self,
        transcript: ChatTranscript,
        message: &str,
    ) -> (ChatTranscript, Result<TurnOutcome, DomainError>) {
        self.execute_with_progress(transcript, message, |_| {}).await
    }

    /// Same as [`Self::execute`], calling `on_stage` before each outbound call.
    pub async fn execute_with_progress<F>(
        &self,
        mut transcript: ChatTranscript,
        message: &str,
        on_stage: F,
    ) -> (ChatTranscript, Result<TurnOutcome, DomainError>)
    where
        F: Fn(TurnStage) + Send + Sync,
    {
        transcript.push(Turn::user(message));

        let outcome = self.run(message, &on_stage).await;
        match &outcome {
            Ok(outcome) => match bot_reply(&outcome.response) {
                Ok(text) => transcript.push(Turn::bot(text)),
                Err(e) => return (transcript, Err(e)),
            },
            Err(e) => warn!("Turn failed: {}", e),
        }

        debug!("Transcript now holds {} turns", transcript.len());
        (transcript, outcome)
    }

    async fn run<F>(&self, message: &str, on_stage: &F) -> Result<TurnOutcome, DomainError>
    where
        F: Fn(TurnStage) + Send + Sync,
    {
        on_stage(TurnStage::Extracting);
        let parameters = self.extract.execute(message).await?;
        on_stage(TurnStage::Forwarding);
        let response = self.forward.execute(parameters.clone()).await?;
        Ok(TurnOutcome {
            parameters,
            response,
        })
    }
}

/// Pretty-printed webhook response, as shown for the bot turn.
pub fn bot_reply(response: &Value) -> Result<String, DomainError> {
    serde_json::to_string_pretty(response)
        .map_err(|e| DomainError::internal(format!("failed to render webhook response: {e}")))
}
