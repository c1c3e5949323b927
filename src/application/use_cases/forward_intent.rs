use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::application::WebhookClient;
use crate::domain::{DomainError, ExtractedParameters, WebhookEnvelope};

/// Wraps extracted parameters in a "Create Data" envelope and posts it.
pub struct ForwardIntentUseCase {
    webhook: Arc<dyn WebhookClient>,
}

impl ForwardIntentUseCase {
    pub fn new(webhook: Arc<dyn WebhookClient>) -> Self {
        Self { webhook }
    }

    pub async fn execute(&self, parameters: ExtractedParameters) -> Result<Value, DomainError> {
        let envelope = WebhookEnvelope::create_data(parameters);
        info!(
            "Forwarding '{}' intent to {} ({})",
            envelope.intent_name(),
            self.webhook.endpoint(),
            envelope.parameters().display_line()
        );
        self.webhook.deliver(&envelope).await
    }
}
