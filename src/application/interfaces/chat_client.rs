use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a single prompt to a text-generation model and returns its reply.
///
/// Implementors own transport, authentication and the vendor's wire format.
/// The reply is returned as plain text; callers decide how to interpret it.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
