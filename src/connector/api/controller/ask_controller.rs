use anyhow::Result;

use crate::application::bot_reply;
use crate::ChatTranscript;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, message: String) -> Result<String> {
        let use_case = self.container.chat_turn_use_case();
        let (_, outcome) = use_case.execute(ChatTranscript::new(), &message).await;
        let outcome = outcome?;

        Ok(format!(
            "Extracted JSON:\n{}\n\nBot:\n{}",
            serde_json::to_string_pretty(&outcome.parameters)?,
            bot_reply(&outcome.response)?
        ))
    }
}
