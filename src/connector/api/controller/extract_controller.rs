use anyhow::Result;

use super::super::Container;

pub struct ExtractController<'a> {
    container: &'a Container,
}

impl<'a> ExtractController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn extract(&self, message: String) -> Result<String> {
        let use_case = self.container.extract_use_case();
        let params = use_case.execute(&message).await?;
        Ok(serde_json::to_string_pretty(&params)?)
    }
}
