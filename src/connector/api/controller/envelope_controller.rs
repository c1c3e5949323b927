use anyhow::Result;

use crate::{ExtractedParameters, WebhookEnvelope};

/// Renders the envelope the webhook would receive. Needs no container since
/// nothing leaves the process.
#[derive(Default)]
pub struct EnvelopeController;

impl EnvelopeController {
    pub fn new() -> Self {
        Self
    }

    pub fn envelope(
        &self,
        version: String,
        month: String,
        measure: String,
        value: String,
    ) -> Result<String> {
        let envelope =
            WebhookEnvelope::create_data(ExtractedParameters::new(version, month, measure, value));
        Ok(serde_json::to_string_pretty(&envelope)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_create_data_envelope() {
        let output = EnvelopeController::new()
            .envelope(
                "Plan Year 1".to_string(),
                "March".to_string(),
                "Headcount".to_string(),
                "120".to_string(),
            )
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["queryResult"]["intent"]["displayName"], "Create Data");
        assert_eq!(json["queryResult"]["parameters"]["value"], "120");
    }
}
