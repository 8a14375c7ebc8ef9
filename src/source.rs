//! Source resolution
//!
//! Turns an [`InputDescriptor`] into something the extractors can work on:
//! a ready string for inline text, an HTML body for URLs, or the raw bytes
//! of an uploaded file.

use crate::error::{ExtractError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for URL fetches.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Declared type of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
        }
    }

    /// File extension (lowercase, no dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// Get all kinds
    pub fn all() -> Vec<Self> {
        vec![Self::Pdf, Self::Docx, Self::Txt]
    }

    /// Infer the kind from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::all()
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown document kind '{}' (expected pdf, docx or txt)", s))
    }
}

/// Owned upload bytes that can be handed out exactly once.
///
/// A second [`take`](Self::take) fails with [`ExtractError::AlreadyConsumed`]
/// rather than returning an empty buffer, so an exhausted upload is never
/// mistaken for an empty one.
#[derive(Debug, Default)]
pub struct UploadBuffer {
    bytes: Vec<u8>,
    consumed: bool,
}

impl UploadBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            consumed: false,
        }
    }

    /// Read a file from disk into a fresh buffer.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {:?}", bytes.len(), path);
        Ok(Self::new(bytes))
    }

    /// Number of bytes still held (0 once consumed)
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Hand out the bytes. Only the first call succeeds.
    pub fn take(&mut self) -> Result<Vec<u8>> {
        if self.consumed {
            return Err(ExtractError::AlreadyConsumed);
        }
        self.consumed = true;
        Ok(std::mem::take(&mut self.bytes))
    }
}

/// What the user asked us to extract from.
#[derive(Debug)]
pub enum InputDescriptor {
    /// Text typed directly by the user
    InlineText(String),
    /// A web page to fetch
    Url(String),
    /// An uploaded file with its declared kind
    UploadedFile(UploadBuffer, DocumentKind),
}

impl InputDescriptor {
    /// Short label for messages ("Direct Text", "URL", "PDF", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Self::InlineText(_) => "Direct Text",
            Self::Url(_) => "URL",
            Self::UploadedFile(_, kind) => kind.name(),
        }
    }
}

/// Output of the resolver, ready for the extractors.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Already plain text, nothing to extract
    Text(String),
    /// Raw HTML body of a fetched page
    Html(String),
    /// File bytes and the declared kind to parse them as
    File { bytes: Vec<u8>, kind: DocumentKind },
}

/// Fetches URLs and unwraps uploads.
pub struct SourceResolver {
    client: reqwest::Client,
}

impl SourceResolver {
    /// Create a resolver whose URL fetches give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Resolve an input into text, HTML or file bytes.
    pub async fn resolve(&self, input: InputDescriptor) -> Result<Resolved> {
        match input {
            InputDescriptor::InlineText(text) => Ok(Resolved::Text(text)),
            InputDescriptor::Url(url) => Ok(Resolved::Html(self.fetch(&url).await?)),
            InputDescriptor::UploadedFile(mut buffer, kind) => {
                let bytes = buffer.take()?;
                Ok(Resolved::File { bytes, kind })
            }
        }
    }

    /// GET a URL and return the body. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!("{} answered {}", url, status);

        let response = response.error_for_status()?;
        let body = response.text().await?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::Html;
    use axum::routing::get;
    use axum::Router;
    use std::path::PathBuf;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn test_app() -> Router {
        Router::new()
            .route("/page", get(|| async { Html("<html><body><p>Hello</p></body></html>") }))
            .route("/gone", get(|| async { (StatusCode::NOT_FOUND, "missing") }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    "late"
                }),
            )
    }

    #[test]
    fn test_kind_from_path() {
        let kind = |name: &str| DocumentKind::from_path(&PathBuf::from(name));

        assert_eq!(kind("a/report.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(kind("notes.docx"), Some(DocumentKind::Docx));
        assert_eq!(kind("readme.txt"), Some(DocumentKind::Txt));
        assert_eq!(kind("image.png"), None);
        assert_eq!(kind("Makefile"), None);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("docx".parse::<DocumentKind>(), Ok(DocumentKind::Docx));
        assert_eq!(" TXT ".parse::<DocumentKind>(), Ok(DocumentKind::Txt));
        assert!("html".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_upload_buffer_is_one_shot() {
        let mut buffer = UploadBuffer::new(b"abc".to_vec());
        assert_eq!(buffer.len(), 3);
        assert!(!buffer.is_consumed());

        assert_eq!(buffer.take().unwrap(), b"abc".to_vec());
        assert!(buffer.is_consumed());
        assert!(buffer.is_empty());

        assert!(matches!(buffer.take(), Err(ExtractError::AlreadyConsumed)));
    }

    #[test]
    fn test_empty_upload_is_not_consumed() {
        let mut buffer = UploadBuffer::new(Vec::new());
        assert!(!buffer.is_consumed());
        assert_eq!(buffer.take().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.txt");
        std::fs::write(&path, "contents").unwrap();

        let buffer = UploadBuffer::from_path(&path).unwrap();
        assert_eq!(buffer.len(), 8);

        let missing = UploadBuffer::from_path(&dir.path().join("nope.txt"));
        assert!(matches!(missing, Err(ExtractError::Io(_))));
    }

    #[tokio::test]
    async fn test_resolve_inline_and_upload() {
        let resolver = SourceResolver::new(DEFAULT_FETCH_TIMEOUT).unwrap();

        let text = resolver
            .resolve(InputDescriptor::InlineText("typed".to_string()))
            .await
            .unwrap();
        assert_eq!(text, Resolved::Text("typed".to_string()));

        let upload =
            InputDescriptor::UploadedFile(UploadBuffer::new(vec![1, 2, 3]), DocumentKind::Pdf);
        let file = resolver.resolve(upload).await.unwrap();
        assert_eq!(
            file,
            Resolved::File {
                bytes: vec![1, 2, 3],
                kind: DocumentKind::Pdf
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let base = serve(test_app()).await;
        let resolver = SourceResolver::new(DEFAULT_FETCH_TIMEOUT).unwrap();

        let resolved = resolver
            .resolve(InputDescriptor::Url(format!("{}/page", base)))
            .await
            .unwrap();
        assert_eq!(
            resolved,
            Resolved::Html("<html><body><p>Hello</p></body></html>".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_404_is_fetch_error() {
        let base = serve(test_app()).await;
        let resolver = SourceResolver::new(DEFAULT_FETCH_TIMEOUT).unwrap();

        let err = resolver.fetch(&format!("{}/gone", base)).await.unwrap_err();
        match err {
            ExtractError::Fetch(msg) => assert!(msg.contains("404"), "unexpected message: {}", msg),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let base = serve(test_app()).await;
        let resolver = SourceResolver::new(Duration::from_millis(100)).unwrap();

        let err = resolver.fetch(&format!("{}/slow", base)).await.unwrap_err();
        assert!(matches!(err, ExtractError::Fetch(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_fetch_bad_url() {
        let resolver = SourceResolver::new(DEFAULT_FETCH_TIMEOUT).unwrap();
        let err = resolver.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ExtractError::Fetch(_)));
    }
}
