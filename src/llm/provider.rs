//! The Provider Abstraction.
//!
//! This trait defines the standard interface for any entity-extraction
//! backend, whether it's a hosted language model or a local NER model.

use super::types::Entity;
use anyhow::Result;
use async_trait::async_trait;

/// The core trait for entity extraction.
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    /// Short backend name for display
    fn name(&self) -> &str;

    /// Find the entities mentioned in `text`.
    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>>;
}
