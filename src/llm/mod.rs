//! Entity extraction layer
//!
//! Provider abstraction over whatever turns extracted text into entity
//! records. Only a placeholder backend ships today.

pub mod placeholder;
pub mod provider;
pub mod types;

// Re-export key types
pub use placeholder::PlaceholderExtractor;
pub use provider::EntityExtractor;
pub use types::Entity;
