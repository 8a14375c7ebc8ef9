//! Text extraction
//!
//! Dispatches resolved input on its declared type:
//!
//! | Kind | Strategy |
//! |------|----------|
//! | URL  | strip HTML markup ([`html`]) |
//! | PDF  | page text layer, OCR fallback when blank ([`pdf`]) |
//! | DOCX | paragraphs joined by newlines ([`docx`]) |
//! | TXT  | strict UTF-8 decode ([`text`]) |

pub mod docx;
pub mod html;
pub mod pdf;
pub mod text;

use crate::config::OcrConfig;
use crate::error::Result;
use crate::ocr::OcrFallback;
use crate::source::{DocumentKind, Resolved};
use self::pdf::{OxidePages, PdfExtractor};
use serde::Serialize;
use tracing::debug;

/// Successfully extracted text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Extraction {
    pub text: String,
    /// User-facing notices raised along the way
    pub warnings: Vec<String>,
    /// Whether the text came from OCR rather than an embedded text layer
    pub used_ocr: bool,
}

impl Extraction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Turns resolved input into plain text.
pub struct TextExtractor {
    pdf: PdfExtractor,
}

impl TextExtractor {
    pub fn new(pdf: PdfExtractor) -> Self {
        Self { pdf }
    }

    /// pdf_oxide for the text layer, pdftoppm + tesseract for OCR.
    pub fn from_config(ocr: &OcrConfig) -> Self {
        Self::new(PdfExtractor::new(
            Box::new(OxidePages),
            OcrFallback::from_config(ocr),
        ))
    }

    pub fn extract(&self, resolved: Resolved) -> Result<Extraction> {
        match resolved {
            Resolved::Text(text) => Ok(Extraction::new(text)),
            Resolved::Html(body) => Ok(Extraction::new(html::extract_html(&body))),
            Resolved::File { bytes, kind } => self.extract_file(kind, &bytes),
        }
    }

    /// Extract from file bytes of a declared kind.
    ///
    /// An empty upload yields empty text without touching a parser.
    pub fn extract_file(&self, kind: DocumentKind, bytes: &[u8]) -> Result<Extraction> {
        if bytes.is_empty() {
            debug!("Empty {} upload", kind);
            return Ok(Extraction::default());
        }

        debug!("Extracting {} ({} bytes)", kind, bytes.len());
        match kind {
            DocumentKind::Pdf => self.pdf.extract(bytes),
            DocumentKind::Docx => Ok(Extraction::new(docx::extract_docx(bytes)?)),
            DocumentKind::Txt => Ok(Extraction::new(text::decode_text(bytes)?)),
        }
    }
}
