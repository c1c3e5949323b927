use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::application::WebhookClient;
use crate::domain::{DomainError, WebhookEnvelope};

/// In-process [`WebhookClient`] that records every envelope it receives.
///
/// By default it answers with a fulfillment-style body echoing the
/// parameters back; it can also be told to fail every delivery.
pub struct MockWebhookClient {
    delivered: Mutex<Vec<WebhookEnvelope>>,
    failure: Option<String>,
}

impl MockWebhookClient {
    pub fn new() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Envelopes received so far, oldest first.
    pub fn delivered(&self) -> Vec<WebhookEnvelope> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl Default for MockWebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookClient for MockWebhookClient {
    async fn deliver(&self, envelope: &WebhookEnvelope) -> Result<Value, DomainError> {
        self.delivered
            .lock()
            .map_err(|_| DomainError::internal("MockWebhookClient: lock poisoned"))?
            .push(envelope.clone());

        if let Some(message) = &self.failure {
            return Err(DomainError::webhook(message.clone()));
        }

        let params = envelope.parameters();
        Ok(json!({
            "fulfillmentText": format!(
                "[mock] {}: {} {} {} = {}",
                envelope.intent_name(),
                params.version,
                params.month,
                params.measure,
                params.value
            ),
            "parameters": params,
        }))
    }

    fn endpoint(&self) -> &str {
        "mock://webhook"
    }
}
