//! Universal types for entity extraction.
//!
//! These types isolate the application logic from specific provider APIs.

use serde::{Deserialize, Serialize};

/// A named entity found in extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Entity class such as PERSON, ORGANIZATION or LOCATION
    pub category: String,
    /// Snippet of surrounding text
    pub context: String,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            context: context.into(),
        }
    }
}
