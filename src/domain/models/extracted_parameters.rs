use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The four fields pulled out of a user message by the model.
///
/// Values are kept exactly as the model produced them. Nothing here checks
/// that `version` is a known plan or that `value` is numeric; the downstream
/// webhook owns that decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub month: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub measure: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
}

impl ExtractedParameters {
    pub fn new(
        version: impl Into<String>,
        month: impl Into<String>,
        measure: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            month: month.into(),
            measure: measure.into(),
            value: value.into(),
        }
    }

    /// Record with every field set to the empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_empty()
            && self.month.is_empty()
            && self.measure.is_empty()
            && self.value.is_empty()
    }

    pub fn display_line(&self) -> String {
        format!(
            "version={:?} month={:?} measure={:?} value={:?}",
            self.version, self.month, self.measure, self.value
        )
    }
}

/// Models sometimes emit `"value": 120` instead of `"value": "120"`.
/// Scalars are kept as their JSON text and `null` collapses to `""`.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let params: ExtractedParameters = serde_json::from_str(r#"{"month": "March"}"#).unwrap();
        assert_eq!(params, ExtractedParameters::new("", "March", "", ""));
    }

    #[test]
    fn numeric_and_null_values_are_coerced() {
        let params: ExtractedParameters =
            serde_json::from_str(r#"{"version": null, "value": 120}"#).unwrap();
        assert_eq!(params.version, "");
        assert_eq!(params.value, "120");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let params: ExtractedParameters =
            serde_json::from_str(r#"{"measure": "Headcount", "confidence": 0.9}"#).unwrap();
        assert_eq!(params.measure, "Headcount");
    }

    #[test]
    fn empty_record_reports_empty() {
        assert!(ExtractedParameters::empty().is_empty());
        assert!(!ExtractedParameters::new("Plan Year 1", "", "", "").is_empty());
    }

    #[test]
    fn serializes_all_four_keys() {
        let json = serde_json::to_value(ExtractedParameters::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"version": "", "month": "", "measure": "", "value": ""})
        );
    }
}
