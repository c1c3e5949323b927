use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{DomainError, WebhookEnvelope};

/// Delivers an envelope to the downstream webhook.
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// Post the envelope and return the decoded JSON response body as-is.
    ///
    /// Transport failures, non-success statuses and non-JSON bodies are all
    /// errors; there is no retry and no synthesized success.
    async fn deliver(&self, envelope: &WebhookEnvelope) -> Result<Value, DomainError>;

    fn endpoint(&self) -> &str;
}
