//! Error types for glean.

use thiserror::Error;

/// Failures on the extraction path.
///
/// None of these are fatal to the process: the pipeline reports them and
/// moves on to the next request.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// URL unreachable, timed out, or answered with a non-2xx status
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Malformed PDF, DOCX or HTML
    #[error("parse error: {0}")]
    Parse(String),

    /// Bytes are not valid text in the expected encoding
    #[error("decode error: {0}")]
    Decode(String),

    /// Page rasterization or character recognition failed
    #[error("ocr error: {0}")]
    Ocr(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload buffer was already handed out once
    #[error("upload buffer was already consumed")]
    AlreadyConsumed,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Fetch(format!("request timed out: {err}"))
        } else if let Some(status) = err.status() {
            Self::Fetch(format!("server returned {status}"))
        } else {
            Self::Fetch(err.to_string())
        }
    }
}

impl From<std::string::FromUtf8Error> for ExtractError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Startup configuration errors. These abort the process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no API key configured (set GLEAN_API_KEY or run `glean init`)")]
    MissingApiKey,

    #[error("invalid API key: {0}")]
    InvalidApiKey(String),
}

/// Chunker configuration errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be at least one word")]
    InvalidSize,
}

/// Result alias for the extraction path.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_display() {
        let err = ExtractError::Fetch("server returned 404 Not Found".to_string());
        assert_eq!(err.to_string(), "fetch error: server returned 404 Not Found");
    }

    #[test]
    fn test_decode_from_utf8_error() {
        let bad = String::from_utf8(vec![0xff, 0xfe, 0x41]).unwrap_err();
        let err: ExtractError = bad.into();
        assert!(matches!(err, ExtractError::Decode(_)));
        assert!(err.to_string().starts_with("decode error:"));
    }

    #[test]
    fn test_io_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "upload.pdf");
        let err: ExtractError = io_err.into();
        assert!(matches!(err, ExtractError::Io(_)));
        assert!(err.to_string().contains("upload.pdf"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidApiKey("contains whitespace".to_string());
        assert_eq!(err.to_string(), "invalid API key: contains whitespace");
        assert!(ConfigError::MissingApiKey.to_string().contains("GLEAN_API_KEY"));
    }

    #[test]
    fn test_chunk_error_display() {
        assert_eq!(
            ChunkError::InvalidSize.to_string(),
            "chunk size must be at least one word"
        );
    }
}
