use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Malformed model reply: {0}")]
    MalformedReply(String),

    #[error("Webhook error: {0}")]
    WebhookError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn model(msg: impl Into<String>) -> Self {
        Self::ModelError(msg.into())
    }

    pub fn malformed_reply(msg: impl Into<String>) -> Self {
        Self::MalformedReply(msg.into())
    }

    pub fn webhook(msg: impl Into<String>) -> Self {
        Self::WebhookError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_malformed_reply(&self) -> bool {
        matches!(self, Self::MalformedReply(_))
    }

    pub fn is_webhook_error(&self) -> bool {
        matches!(self, Self::WebhookError(_))
    }

    pub fn is_model_error(&self) -> bool {
        matches!(self, Self::ModelError(_))
    }
}
