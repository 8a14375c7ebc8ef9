//! Placeholder entity extractor.
//!
//! Returns one fixed record for any input. It holds the generative-AI
//! settings so a real backend can take its place without changing callers.

use super::provider::EntityExtractor;
use super::types::Entity;
use crate::config::GenAiConfig;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

pub struct PlaceholderExtractor<'a> {
    config: &'a GenAiConfig,
}

impl<'a> PlaceholderExtractor<'a> {
    pub fn new(config: &'a GenAiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenAiConfig {
        self.config
    }
}

#[async_trait]
impl EntityExtractor for PlaceholderExtractor<'_> {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        debug!(
            "Placeholder entity extraction over {} chars (model {})",
            text.len(),
            self.config.model()
        );
        Ok(vec![Entity::new("John Doe", "PERSON", "Example context")])
    }
}
