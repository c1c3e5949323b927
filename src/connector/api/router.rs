use anyhow::{bail, Result};

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ExtractController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    ask_controller: AskController<'a>,
    extract_controller: ExtractController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            ask_controller: AskController::new(container),
            extract_controller: ExtractController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { transcript } => self.chat_controller.chat(transcript).await,
            Commands::Ask { message } => self.ask_controller.ask(message).await,
            Commands::Extract { message } => self.extract_controller.extract(message).await,
            Commands::Envelope { .. } => bail!("envelope command is handled separately in main"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{ContainerConfig, MockChatClient, MockWebhookClient};

    #[tokio::test]
    async fn envelope_is_not_routed() {
        let container = Container::with_clients(
            Arc::new(MockChatClient::new()),
            Arc::new(MockWebhookClient::new()),
            ContainerConfig::default(),
        );
        let result = Router::new(&container)
            .route(Commands::Envelope {
                version: String::new(),
                month: String::new(),
                measure: String::new(),
                value: String::new(),
            })
            .await;
        assert!(result.is_err());
    }
}
