use serde::{Deserialize, Serialize};

use super::ExtractedParameters;

/// Intent name the downstream webhook routes "write a planning value" requests on.
pub const CREATE_DATA_INTENT: &str = "Create Data";

/// Body of a webhook call, shaped like a conversational-platform fulfillment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEnvelope {
    pub query_result: QueryResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub intent: Intent,
    pub parameters: ExtractedParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub display_name: String,
}

impl WebhookEnvelope {
    pub fn create_data(parameters: ExtractedParameters) -> Self {
        Self {
            query_result: QueryResult {
                intent: Intent {
                    display_name: CREATE_DATA_INTENT.to_string(),
                },
                parameters,
            },
        }
    }

    pub fn intent_name(&self) -> &str {
        &self.query_result.intent.display_name
    }

    pub fn parameters(&self) -> &ExtractedParameters {
        &self.query_result.parameters
    }
}
