use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::application::ChatClient;
use crate::connector::adapter::{ensure_http_url, http_client_builder};
use crate::domain::DomainError;

/// Default target: LM Studio running locally on its standard port.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "http://localhost:1234";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "ministral-3b-2512";
const MAX_TOKENS: u32 = 256;

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// HTTP client for the Anthropic Messages API and compatible servers such
/// as LM Studio.
///
/// **Local-first defaults**: targets `http://localhost:1234` without an API
/// key. Override via environment variables to target the Anthropic cloud:
///
/// ```text
/// ANTHROPIC_BASE_URL=https://api.anthropic.com
/// ANTHROPIC_API_KEY=sk-ant-...
/// ANTHROPIC_MODEL=claude-haiku-4-5
/// ```
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        ensure_http_url("ANTHROPIC_BASE_URL", &base)?;
        let url = format!("{}{MESSAGES_PATH}", base.trim_end_matches('/'));
        let client = http_client_builder(timeout)
            .build()
            .map_err(|e| DomainError::config(format!("AnthropicClient: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            url,
        })
    }

    /// Construct from environment variables with local-first defaults:
    ///
    /// | Variable             | Default                   |
    /// |----------------------|---------------------------|
    /// | `ANTHROPIC_BASE_URL` | `http://localhost:1234`   |
    /// | `ANTHROPIC_MODEL`    | `ministral-3b-2512`       |
    /// | `ANTHROPIC_API_KEY`  | `""` (empty)              |
    pub fn from_env(model: Option<&str>, timeout: Option<Duration>) -> Result<Self, DomainError> {
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_ANTHROPIC_BASE_URL.to_string());
        let model = model
            .map(str::to_string)
            .or_else(|| std::env::var("ANTHROPIC_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());
        let key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        Self::new(key, model, base, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::model(format!("AnthropicClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicClient: API returned {status}: {body}");
            return Err(DomainError::model(format!(
                "AnthropicClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::model(format!("AnthropicClient: failed to parse response: {e}"))
        })?;

        Ok(api_response
            .content
            .into_iter()
            .map(|b| b.text)
            .collect::<String>())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
