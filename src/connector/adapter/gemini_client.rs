use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::ChatClient;
use crate::connector::adapter::{ensure_http_url, http_client_builder};
use crate::domain::DomainError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// The reply text is the concatenation of every text part of the first
/// candidate. A response with no candidates (for instance a blocked prompt)
/// is an error rather than an empty reply.
///
/// | Variable          | Default                                     |
/// |-------------------|---------------------------------------------|
/// | `GEMINI_API_KEY`  | required                                    |
/// | `GEMINI_MODEL`    | `gemini-2.5-flash`                          |
/// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        ensure_http_url("GEMINI_BASE_URL", &base)?;
        let model: String = model.into();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            base.trim_end_matches('/'),
            model
        );
        let client = http_client_builder(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("GeminiClient: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model,
            url,
        })
    }

    /// Build from `GEMINI_*` variables. `model` overrides `GEMINI_MODEL`.
    pub fn from_env(model: Option<&str>, timeout: Option<Duration>) -> Result<Self, DomainError> {
        let key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::config("GEMINI_API_KEY is not set"))?;
        let model = model
            .map(str::to_string)
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let base = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
        Self::new(key, model, base, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn reply_text(response: GenerateContentResponse) -> Result<String, DomainError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::model("GeminiClient: response has no candidates"))?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            debug!("GeminiClient: finish reason {}", reason);
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::model(format!("GeminiClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::model(format!("GeminiClient: API returned {status}")));
        }

        let api_response: GenerateContentResponse = response.json().await.map_err(|e| {
            DomainError::model(format!("GeminiClient: failed to parse response: {e}"))
        })?;

        Self::reply_text(api_response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
