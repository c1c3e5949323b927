use serde_json::Value;

use crate::domain::ExtractedParameters;

/// How a model reply was turned into parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyParse {
    /// The whole reply (minus a code fence) was a JSON object.
    FullDocument(ExtractedParameters),
    /// Only the span between the first `{` and the last `}` parsed.
    Substring(ExtractedParameters),
    /// The reply contains no `{ ... }` span at all.
    NoCandidate,
    /// A `{ ... }` span exists but is not a JSON object.
    Malformed { candidate: String, reason: String },
}

impl ReplyParse {
    pub fn parameters(&self) -> Option<&ExtractedParameters> {
        match self {
            ReplyParse::FullDocument(p) | ReplyParse::Substring(p) => Some(p),
            _ => None,
        }
    }
}

/// Classify a raw model reply.
pub fn parse_reply(text: &str) -> ReplyParse {
    let body = strip_code_fence(text);

    if let Some(params) = parse_object(body).ok().flatten() {
        return ReplyParse::FullDocument(params);
    }

    let Some(candidate) = json_candidate(body) else {
        return ReplyParse::NoCandidate;
    };

    match parse_object(candidate) {
        Ok(Some(params)) => ReplyParse::Substring(params),
        Ok(None) => ReplyParse::Malformed {
            candidate: candidate.to_string(),
            reason: "not a JSON object".to_string(),
        },
        Err(e) => ReplyParse::Malformed {
            candidate: candidate.to_string(),
            reason: e.to_string(),
        },
    }
}

/// Span from the first `{` to the last `}`, line breaks included.
pub fn json_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn strip_code_fence(text: &str) -> &str {
    let raw = text.trim();
    if !(raw.starts_with("```") && raw.ends_with("```")) || raw.len() < 6 {
        return raw;
    }
    let inner = &raw[3..raw.len() - 3];
    // Drop the info string (e.g. "json") on the opening fence line.
    match inner.split_once('\n') {
        Some((_, rest)) => rest.trim(),
        None => inner.trim(),
    }
}

fn parse_object(text: &str) -> Result<Option<ExtractedParameters>, serde_json::Error> {
    match serde_json::from_str::<Value>(text)? {
        value @ Value::Object(_) => serde_json::from_value(value).map(Some),
        _ => Ok(None),
    }
}
