use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatClient, ChatTurnUseCase, ExtractParametersUseCase, ForwardIntentUseCase,
    MalformedReplyPolicy, WebhookClient,
};
use crate::connector::adapter::DEFAULT_WEBHOOK_URL;
use crate::domain::DomainError;
use crate::{AnthropicClient, GeminiClient, HttpWebhookClient, MockChatClient, MockWebhookClient};

/// Which model service answers the extraction prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelProvider {
    #[default]
    Gemini,
    Anthropic,
    Mock,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Gemini => "gemini",
            ModelProvider::Anthropic => "anthropic",
            ModelProvider::Mock => "mock",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelProvider::Gemini),
            "anthropic" => Ok(ModelProvider::Anthropic),
            "mock" => Ok(ModelProvider::Mock),
            other => Err(DomainError::invalid_input(format!(
                "unknown provider '{other}' (expected gemini, anthropic or mock)"
            ))),
        }
    }
}

#[derive(Default)]
pub struct ContainerConfig {
    pub provider: ModelProvider,
    /// Overrides the provider's model environment variable.
    pub model: Option<String>,
    /// Overrides `PLANCHAT_WEBHOOK_URL`.
    pub webhook_url: Option<String>,
    /// Overrides `PLANCHAT_CA_CERT`.
    pub ca_cert: Option<PathBuf>,
    /// Answer webhook calls in-process instead of over the network.
    pub mock_webhook: bool,
    /// Applies to both outbound clients; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub malformed_policy: MalformedReplyPolicy,
}

pub struct Container {
    chat_client: Arc<dyn ChatClient>,
    webhook_client: Arc<dyn WebhookClient>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let model = config.model.as_deref();

        let chat_client: Arc<dyn ChatClient> = match config.provider {
            ModelProvider::Gemini => {
                debug!("Using Gemini model service");
                Arc::new(GeminiClient::from_env(model, config.timeout)?)
            }
            ModelProvider::Anthropic => {
                debug!("Using Anthropic-compatible model service");
                Arc::new(AnthropicClient::from_env(model, config.timeout)?)
            }
            ModelProvider::Mock => {
                debug!("Using mock model service");
                Arc::new(MockChatClient::new())
            }
        };

        let webhook_client: Arc<dyn WebhookClient> = if config.mock_webhook {
            debug!("Using mock webhook");
            Arc::new(MockWebhookClient::new())
        } else {
            let url = config
                .webhook_url
                .clone()
                .or_else(|| std::env::var("PLANCHAT_WEBHOOK_URL").ok())
                .unwrap_or_else(|| DEFAULT_WEBHOOK_URL.to_string());
            let ca_cert = config
                .ca_cert
                .clone()
                .or_else(|| std::env::var_os("PLANCHAT_CA_CERT").map(PathBuf::from));
            Arc::new(HttpWebhookClient::new(url, ca_cert.as_deref(), config.timeout)?)
        };

        Ok(Self::with_clients(chat_client, webhook_client, config))
    }

    /// Wire pre-built clients, bypassing provider selection.
    pub fn with_clients(
        chat_client: Arc<dyn ChatClient>,
        webhook_client: Arc<dyn WebhookClient>,
        config: ContainerConfig,
    ) -> Self {
        Self {
            chat_client,
            webhook_client,
            config,
        }
    }

    pub fn extract_use_case(&self) -> ExtractParametersUseCase {
        ExtractParametersUseCase::new(self.chat_client.clone())
            .with_malformed_policy(self.config.malformed_policy)
    }

    pub fn forward_use_case(&self) -> ForwardIntentUseCase {
        ForwardIntentUseCase::new(self.webhook_client.clone())
    }

    pub fn chat_turn_use_case(&self) -> ChatTurnUseCase {
        ChatTurnUseCase::new(self.extract_use_case(), self.forward_use_case())
    }

    pub fn model_name(&self) -> &str {
        self.chat_client.model_name()
    }

    pub fn webhook_endpoint(&self) -> &str {
        self.webhook_client.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_round_trip() {
        for provider in [ModelProvider::Gemini, ModelProvider::Anthropic, ModelProvider::Mock] {
            assert_eq!(provider.as_str().parse::<ModelProvider>().unwrap(), provider);
        }
        assert!("openai".parse::<ModelProvider>().is_err());
    }

    #[test]
    fn mock_wiring_needs_no_environment() {
        let container = Container::new(ContainerConfig {
            provider: ModelProvider::Mock,
            mock_webhook: true,
            ..ContainerConfig::default()
        })
        .unwrap();

        assert_eq!(container.model_name(), "mock-rules");
        assert_eq!(container.webhook_endpoint(), "mock://webhook");
    }
}
