//! glean - plain text out of web pages, PDFs, Word documents and text files
//!
//! Scanned PDFs fall back to OCR. Extracted text can be split into word
//! chunks or handed to an entity extractor.

pub mod chunking;
pub mod config;
pub mod error;
pub mod extract;
pub mod init;
pub mod llm;
pub mod ocr;
pub mod pipeline;
pub mod source;

pub use chunking::{chunk_text, TextChunk, WordChunker, DEFAULT_CHUNK_SIZE};
pub use config::{Config, GenAiConfig, OcrConfig};
pub use error::{ChunkError, ConfigError, ExtractError};
pub use extract::{Extraction, TextExtractor};
pub use init::{run_init, show_info, show_welcome, InitResult};
pub use llm::{Entity, EntityExtractor, PlaceholderExtractor};
pub use ocr::OcrFallback;
pub use pipeline::{preview, ExtractionResult, Pipeline, Reporter};
pub use source::{DocumentKind, InputDescriptor, SourceResolver, UploadBuffer};
