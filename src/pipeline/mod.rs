//! Extraction pipeline
//!
//! Resolver → extractor (→ OCR fallback) → result. Strictly linear, one
//! request at a time, no retries.

pub mod progress;

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::extract::{Extraction, TextExtractor};
use crate::source::{InputDescriptor, SourceResolver};
pub use progress::Reporter;
use tracing::info;

/// Outcome of one request: always a string, plus what went wrong if anything.
///
/// `text` is empty when `error` is set, but empty text with no error means
/// the input really had nothing in it.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    pub text: String,
    pub warnings: Vec<String>,
    pub used_ocr: bool,
    pub error: Option<ExtractError>,
}

impl ExtractionResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// First `max_chars` characters of the text
    pub fn preview(&self, max_chars: usize) -> &str {
        preview(&self.text, max_chars)
    }
}

impl From<Result<Extraction>> for ExtractionResult {
    fn from(result: Result<Extraction>) -> Self {
        match result {
            Ok(extraction) => Self {
                text: extraction.text,
                warnings: extraction.warnings,
                used_ocr: extraction.used_ocr,
                error: None,
            },
            Err(err) => Self {
                error: Some(err),
                ..Self::default()
            },
        }
    }
}

/// Slice `text` down to at most `max_chars` characters, on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// The source-to-text pipeline.
pub struct Pipeline {
    resolver: SourceResolver,
    extractor: TextExtractor,
}

impl Pipeline {
    pub fn new(resolver: SourceResolver, extractor: TextExtractor) -> Self {
        Self {
            resolver,
            extractor,
        }
    }

    /// Real resolver and extractors, configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            SourceResolver::new(config.fetch_timeout())?,
            TextExtractor::from_config(&config.ocr),
        ))
    }

    /// Typed extraction: the text, or the error that stopped it.
    pub async fn extract(&self, input: InputDescriptor) -> Result<Extraction> {
        info!("Extracting from {}", input.label());
        let resolved = self.resolver.resolve(input).await?;
        self.extractor.extract(resolved)
    }

    /// Extraction for display. Errors are reported through `reporter` and
    /// never escape; the result then carries empty text and the error.
    pub async fn run(&self, input: InputDescriptor, reporter: &mut Reporter) -> ExtractionResult {
        let label = input.label();
        let result = ExtractionResult::from(self.extract(input).await);

        for warning in &result.warnings {
            reporter.warn(warning);
        }
        if let Some(err) = &result.error {
            reporter.error(&format!("Error extracting text from {}", label), err);
        }

        result
    }
}
