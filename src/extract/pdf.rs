//! PDF text extraction with OCR fallback
//!
//! The embedded text layer is read page by page with pdf_oxide. When every
//! page comes back blank (scanned documents), the same file is handed to the
//! [`OcrFallback`].

use super::Extraction;
use crate::error::{ExtractError, Result};
use crate::ocr::OcrFallback;
use pdf_oxide::PdfDocument;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Warning surfaced when the OCR fallback kicks in
pub const NO_TEXT_LAYER_WARNING: &str = "PDF contains no extractable text. Using OCR...";

/// Source of per-page embedded text.
pub trait PageTextSource: Send + Sync {
    /// One entry per page, in page order. Pages without a text layer are
    /// empty strings.
    fn page_texts(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads the text layer with pdf_oxide.
#[derive(Debug, Default)]
pub struct OxidePages;

impl PageTextSource for OxidePages {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| ExtractError::Parse(format!("failed to parse PDF: {e}")))?;

        let page_count = doc
            .page_count()
            .map_err(|e| ExtractError::Parse(format!("failed to read page count: {e}")))?;

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            match doc.extract_text(page_index) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    debug!("No text layer on page {}: {}", page_index + 1, e);
                    pages.push(String::new());
                }
            }
        }

        Ok(pages)
    }
}

/// PDF extractor: text layer first, OCR when the text layer is blank.
pub struct PdfExtractor {
    pages: Box<dyn PageTextSource>,
    ocr: OcrFallback,
}

impl PdfExtractor {
    pub fn new(pages: Box<dyn PageTextSource>, ocr: OcrFallback) -> Self {
        Self { pages, ocr }
    }

    /// Extract from an in-memory PDF.
    ///
    /// Both pdf_oxide and the rasterizer want a file path, so the bytes are
    /// written to a temporary file that is deleted when this returns.
    pub fn extract(&self, bytes: &[u8]) -> Result<Extraction> {
        let mut file = tempfile::Builder::new()
            .prefix("glean-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        self.extract_path(file.path())
    }

    /// Extract from a PDF already on disk.
    pub fn extract_path(&self, path: &Path) -> Result<Extraction> {
        let pages = self.pages.page_texts(path)?;
        info!("PDF text layer: {} pages", pages.len());

        let text = pages.join(" ");
        if !text.trim().is_empty() {
            return Ok(Extraction::new(text));
        }

        warn!("{}", NO_TEXT_LAYER_WARNING);
        let text = self.ocr.recover(path)?;

        Ok(Extraction {
            text,
            warnings: vec![NO_TEXT_LAYER_WARNING.to_string()],
            used_ocr: true,
        })
    }
}



#[cfg(test)]
mod tests {
    use super::fakes::FixedPages;
    use super::fixtures::pdf_bytes;
    use super::*;
    use crate::ocr::fakes::{FailingRecognizer, FileRecognizer, ScriptedRasterizer};
    use std::sync::atomic::Ordering;

    #[test]
    fn test_text_layer_joined_with_space() {
        let rasterizer = ScriptedRasterizer::new(&["ignored"]);
        let ocr_calls = rasterizer.calls.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&["First page", "", "Third page"])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let extraction = extractor.extract(b"%PDF-1.4 fake").unwrap();
        assert_eq!(extraction.text, "First page  Third page");
        assert!(!extraction.used_ocr);
        assert!(extraction.warnings.is_empty());
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_blank_pages_fall_back_to_ocr_once() {
        let rasterizer = ScriptedRasterizer::new(&["Page1Text", "Page2Text"]);
        let ocr_calls = rasterizer.calls.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&["", ""])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let extraction = extractor.extract(b"%PDF-1.4 scanned").unwrap();
        assert_eq!(extraction.text, "Page1TextPage2Text");
        assert!(extraction.used_ocr);
        assert_eq!(extraction.warnings, vec![NO_TEXT_LAYER_WARNING.to_string()]);
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_whitespace_only_layer_triggers_ocr() {
        let rasterizer = ScriptedRasterizer::new(&[""]);
        let ocr_calls = rasterizer.calls.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&["  ", "\n\t"])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let extraction = extractor.extract(b"%PDF-1.4").unwrap();
        assert_eq!(extraction.text, "");
        assert!(extraction.used_ocr);
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_temp_pdf_removed_after_ocr_success() {
        let rasterizer = ScriptedRasterizer::new(&["text"]);
        let seen = rasterizer.seen.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&[""])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        extractor.extract(b"%PDF-1.4").unwrap();

        let (pdf, workdir) = seen.lock().unwrap()[0].clone();
        assert!(!pdf.exists());
        assert!(!workdir.exists());
    }

    #[test]
    fn test_temp_pdf_removed_after_ocr_failure() {
        let rasterizer = ScriptedRasterizer::failing();
        let seen = rasterizer.seen.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&[""])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let err = extractor.extract(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));

        let (pdf, _) = seen.lock().unwrap()[0].clone();
        assert!(!pdf.exists());
    }

    #[test]
    fn test_temp_pdf_removed_after_recognition_failure() {
        let rasterizer = ScriptedRasterizer::new(&["a"]);
        let seen = rasterizer.seen.clone();
        let extractor = PdfExtractor::new(
            Box::new(FixedPages::new(&[""])),
            OcrFallback::new(Box::new(rasterizer), Box::new(FailingRecognizer)),
        );

        assert!(extractor.extract(b"%PDF-1.4").is_err());

        let (pdf, workdir) = seen.lock().unwrap()[0].clone();
        assert!(!pdf.exists());
        assert!(!workdir.exists());
    }

    #[test]
    fn test_malformed_pdf_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = OxidePages.page_texts(&path).unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn test_real_text_layer_pages_joined_with_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layered.pdf");
        std::fs::write(&path, pdf_bytes(&["Hello", "", "World"])).unwrap();

        let pages = OxidePages.page_texts(&path).unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].trim(), "Hello");
        assert_eq!(pages[1].trim(), "");
        assert_eq!(pages[2].trim(), "World");

        let rasterizer = ScriptedRasterizer::new(&["unused"]);
        let ocr_calls = rasterizer.calls.clone();
        let extractor = PdfExtractor::new(
            Box::new(OxidePages),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let extraction = extractor.extract_path(&path).unwrap();
        assert_eq!(extraction.text, pages.join(" "));
        assert_eq!(extraction.text.split_whitespace().collect::<Vec<_>>(), vec!["Hello", "World"]);
        assert!(!extraction.used_ocr);
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_real_blank_pdf_falls_back_to_ocr() {
        let rasterizer = ScriptedRasterizer::new(&["Scanned", "Page"]);
        let ocr_calls = rasterizer.calls.clone();
        let extractor = PdfExtractor::new(
            Box::new(OxidePages),
            OcrFallback::new(Box::new(rasterizer), Box::new(FileRecognizer)),
        );

        let extraction = extractor.extract(&pdf_bytes(&["", ""])).unwrap();
        assert_eq!(extraction.text, "ScannedPage");
        assert!(extraction.used_ocr);
        assert_eq!(extraction.warnings, vec![NO_TEXT_LAYER_WARNING.to_string()]);
        assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
    }
}
