//! OCR fallback for PDFs without a text layer
//!
//! Pages are rendered to PNG with `pdftoppm` (poppler-utils) and read back
//! with `tesseract`, one page at a time and in page order. Both steps sit
//! behind traits so other engines can be swapped in.

use crate::config::OcrConfig;
use crate::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Renders every page of a PDF into an image file.
pub trait PageRasterizer: Send + Sync {
    /// Render `pdf` into `out_dir`, returning one image path per page in
    /// page order.
    fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Reads the text off a single page image.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// `pdftoppm -png -r <dpi>`
pub struct Pdftoppm {
    binary: String,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(binary: impl Into<String>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }

    /// Check whether the binary can be launched
    pub fn is_available(&self) -> bool {
        let found = Command::new(&self.binary).arg("-v").output().is_ok();
        if !found {
            debug!("{} not found - install poppler-utils for OCR support", self.binary);
        }
        found
    }
}

impl PageRasterizer for Pdftoppm {
    fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(out_dir.join("page"))
            .output()
            .map_err(|e| ExtractError::Ocr(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(format!(
                "{} failed: {}",
                self.binary,
                stderr.trim()
            )));
        }

        let mut images: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();

        // page-2.png must come before page-10.png
        images.sort_by_key(|path| (page_number(path), path.clone()));

        if images.is_empty() {
            warn!("{} produced no page images for {:?}", self.binary, pdf);
        }

        Ok(images)
    }
}

/// Page number from a `pdftoppm` output name such as `page-07.png`.
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('-').next()?.parse().ok()
}

/// `tesseract <image> stdout -l <language>`
pub struct Tesseract {
    binary: String,
    language: String,
}

impl Tesseract {
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }

    /// Check whether the binary can be launched
    pub fn is_available(&self) -> bool {
        let found = Command::new(&self.binary).arg("--version").output().is_ok();
        if !found {
            debug!("{} not found - install tesseract-ocr for OCR support", self.binary);
        }
        found
    }
}

impl Recognizer for Tesseract {
    fn recognize(&self, image: &Path) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| ExtractError::Ocr(format!("failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(format!(
                "{} failed on {:?}: {}",
                self.binary,
                image.file_name().unwrap_or_default(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Rasterize-then-recognize fallback for image-only PDFs.
pub struct OcrFallback {
    rasterizer: Box<dyn PageRasterizer>,
    recognizer: Box<dyn Recognizer>,
}

impl OcrFallback {
    pub fn new(rasterizer: Box<dyn PageRasterizer>, recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            rasterizer,
            recognizer,
        }
    }

    /// `pdftoppm` + `tesseract` with the configured binaries, DPI and language.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(
            Box::new(Pdftoppm::new(&config.pdftoppm, config.dpi)),
            Box::new(Tesseract::new(&config.tesseract, &config.language)),
        )
    }

    /// Recover the text of a PDF on disk.
    ///
    /// Page texts are concatenated with no separator. Page images are written
    /// to a scratch directory that is removed when this returns, on success
    /// and on failure alike.
    pub fn recover(&self, pdf: &Path) -> Result<String> {
        let workdir = tempfile::Builder::new().prefix("glean-ocr-").tempdir()?;

        let images = self.rasterizer.rasterize(pdf, workdir.path())?;
        let total = images.len();
        info!("Rendered {} pages, starting OCR...", total);

        let mut text = String::new();
        for (i, image) in images.iter().enumerate() {
            let page_text = self.recognizer.recognize(image)?;
            debug!("OCR page {}/{}: {} chars", i + 1, total, page_text.len());
            text.push_str(&page_text);
        }

        info!("OCR complete: {} pages, {} chars", total, text.len());
        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Writes each scripted page text into its "image" file, so that
    /// [`FileRecognizer`] can read it back.
    pub struct ScriptedRasterizer {
        pages: Vec<String>,
        fail: bool,
        pub calls: Arc<AtomicUsize>,
        /// Every (pdf, out_dir) pair seen, in call order
        pub seen: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    }

    impl ScriptedRasterizer {
        pub fn new(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                fail: false,
                calls: Arc::new(AtomicUsize::new(0)),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }
    }

    impl PageRasterizer for ScriptedRasterizer {
        fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((pdf.to_path_buf(), out_dir.to_path_buf()));

            if !pdf.exists() {
                return Err(ExtractError::Ocr(format!("{:?} does not exist", pdf)));
            }
            if self.fail {
                return Err(ExtractError::Ocr("rasterizer exploded".to_string()));
            }

            let mut images = Vec::new();
            for (i, page) in self.pages.iter().enumerate() {
                let path = out_dir.join(format!("page-{}.png", i + 1));
                std::fs::write(&path, page)?;
                images.push(path);
            }
            Ok(images)
        }
    }

    pub struct FileRecognizer;

    impl Recognizer for FileRecognizer {
        fn recognize(&self, image: &Path) -> Result<String> {
            Ok(std::fs::read_to_string(image)?)
        }
    }

    pub struct FailingRecognizer;

    impl Recognizer for FailingRecognizer {
        fn recognize(&self, image: &Path) -> Result<String> {
            Err(ExtractError::Ocr(format!("cannot read {:?}", image)))
        }
    }
}
