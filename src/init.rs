//! Initialization flow for glean
//!
//! Handles first-run setup: asking for the API key and writing the config.

use crate::config::{mask_key, Config, GenAiConfig, API_KEY_ENV};
use crate::ocr::{Pdftoppm, Tesseract};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Result of running the init flow
#[derive(Debug)]
pub enum InitResult {
    /// User completed init with this config
    Configured(Config),
    /// User cancelled the init
    Cancelled,
}

/// Run the interactive init flow on stdin/stdout and save the result.
pub fn run_init(existing_config: Option<&Config>) -> Result<InitResult> {
    let stdin = io::stdin();
    let result = prompt_config(existing_config, &mut stdin.lock(), &mut io::stdout())?;

    if let InitResult::Configured(config) = &result {
        config.save()?;
    }
    Ok(result)
}

/// Build a config from a single API key prompt.
///
/// An empty answer keeps the existing key, or cancels when there is none.
/// Keys that fail validation cancel as well.
fn prompt_config(
    existing_config: Option<&Config>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<InitResult> {
    let existing_key = existing_config.and_then(|c| c.api_key.as_deref());

    if let Some(key) = existing_key {
        writeln!(output, "\nCurrent API key: {}\n", mask_key(key))?;
    }

    match existing_key {
        Some(_) => write!(output, "API key [keep current]: ")?,
        None => write!(output, "API key: ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    let api_key = match (answer.is_empty(), existing_key) {
        (false, _) => answer.to_string(),
        (true, Some(key)) => key.to_string(),
        (true, None) => return Ok(InitResult::Cancelled),
    };

    let mut config = existing_config.cloned().unwrap_or_default();
    if let Err(e) = GenAiConfig::new(api_key.as_str(), config.model.as_str()) {
        writeln!(output, "{}", e)?;
        return Ok(InitResult::Cancelled);
    }
    config.api_key = Some(api_key);

    Ok(InitResult::Configured(config))
}

/// Display the effective configuration and OCR tool availability
pub fn show_info(config: Option<&Config>) {
    println!("glean v{} - text extraction with OCR fallback\n", env!("CARGO_PKG_VERSION"));

    let defaults = Config::default();
    let config = match config {
        Some(config) => config,
        None => {
            println!("No config file. Run 'glean init' to set one up.\n");
            &defaults
        }
    };

    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    let key_status = match (&env_key, &config.api_key) {
        (Some(key), _) => format!("{} (from {})", mask_key(key), API_KEY_ENV),
        (None, Some(key)) => mask_key(key),
        (None, None) => "not set".red().to_string(),
    };

    println!("Settings:");
    println!("  API key:       {}", key_status);
    println!("  Model:         {}", config.model);
    println!("  Fetch timeout: {}s", config.fetch_timeout_secs);
    println!("  Chunk size:    {} words", config.chunk_size);
    println!("  Preview:       {} chars", config.preview_chars);
    println!();

    let pdftoppm = Pdftoppm::new(config.ocr.pdftoppm.as_str(), config.ocr.dpi);
    let tesseract = Tesseract::new(config.ocr.tesseract.as_str(), config.ocr.language.as_str());

    println!("OCR:");
    println!("  Resolution:    {} dpi", config.ocr.dpi);
    println!("  Language:      {}", config.ocr.language);
    for (binary, found) in [
        (&config.ocr.pdftoppm, pdftoppm.is_available()),
        (&config.ocr.tesseract, tesseract.is_available()),
    ] {
        println!("  {:<14} {}", format!("{}:", binary), availability(found));
    }
    println!();

    println!("Run 'glean --help' for commands.");
}

fn availability(found: bool) -> String {
    if found {
        "found".green().to_string()
    } else {
        "missing (scanned PDFs will fail)".yellow().to_string()
    }
}

/// Display first-run welcome message
pub fn show_welcome() {
    println!("glean v{} - text extraction with OCR fallback\n", env!("CARGO_PKG_VERSION"));
    println!("No configuration found. Let's set you up.\n");
}
