//! Configuration management for glean
//!
//! Handles the API key, fetch and OCR settings, and persistence of user
//! preferences in `~/.glean/config.toml`.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the API key from the config file
pub const API_KEY_ENV: &str = "GLEAN_API_KEY";

/// OCR settings for scanned PDFs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Render resolution for page images
    pub dpi: u32,
    /// Tesseract language code
    pub language: String,
    /// `pdftoppm` binary name or path
    pub pdftoppm: String,
    /// `tesseract` binary name or path
    pub tesseract: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            language: "eng".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            tesseract: "tesseract".to_string(),
        }
    }
}

/// glean configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Generative-AI API key (GLEAN_API_KEY wins over this)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model the entity extractor talks to
    pub model: String,
    /// URL fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Words per chunk for `glean chunk`
    pub chunk_size: usize,
    /// Characters of extracted text shown as a preview
    pub preview_chars: usize,
    pub ocr: OcrConfig,
    /// Version of config schema (for future migrations)
    pub version: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-pro".to_string(),
            fetch_timeout_secs: 10,
            chunk_size: crate::chunking::DEFAULT_CHUNK_SIZE,
            preview_chars: 1000,
            ocr: OcrConfig::default(),
            version: 1,
        }
    }
}

impl Config {
    /// Get the config file path (~/.glean/config.toml)
    pub fn path() -> Result<PathBuf> {
        Ok(glean_dir()?.join("config.toml"))
    }

    /// Load config from disk, or return None if it doesn't exist
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&Self::path()?)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(Some(config))
    }

    /// Save config to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Get the base glean directory path (~/.glean)
pub fn glean_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".glean"))
}

/// Credentials and model for the entity-extraction service.
///
/// Built once at startup and handed out by reference.
#[derive(Clone, PartialEq)]
pub struct GenAiConfig {
    api_key: String,
    model: String,
}

impl GenAiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        validate_api_key(&api_key)?;
        Ok(Self {
            api_key,
            model: model.into(),
        })
    }

    /// Resolve the key from the environment value first, then the config file.
    pub fn resolve(env_key: Option<String>, config: &Config) -> Result<Self, ConfigError> {
        let api_key = env_key
            .filter(|k| !k.is_empty())
            .or_else(|| config.api_key.clone())
            .ok_or(ConfigError::MissingApiKey)?;

        Self::new(api_key, config.model.clone())
    }

    /// Startup routine: read GLEAN_API_KEY and fall back to the config file.
    pub fn from_env(config: &Config) -> Result<Self, ConfigError> {
        Self::resolve(std::env::var(API_KEY_ENV).ok(), config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Key with everything after the first four characters hidden
    pub fn masked_key(&self) -> String {
        mask_key(&self.api_key)
    }
}

impl fmt::Debug for GenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenAiConfig")
            .field("api_key", &self.masked_key())
            .field("model", &self.model)
            .finish()
    }
}

/// Hide all but the first four characters of a key
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}

fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidApiKey("contains whitespace".to_string()));
    }
    if key.chars().any(char::is_control) {
        return Err(ConfigError::InvalidApiKey("contains control characters".to_string()));
    }
    Ok(())
}
