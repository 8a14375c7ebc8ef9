//! glean CLI
//!
//! Commands:
//!   extract - Extract text from inline text, a URL or a file
//!   chunk   - Extract text and split it into word chunks
//!   init    - Set up the API key
//!   info    - Show the effective configuration

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use glean::{
    run_init, show_info, show_welcome, Config, DocumentKind, EntityExtractor, ExtractionResult,
    GenAiConfig, InitResult, InputDescriptor, Pipeline, PlaceholderExtractor, Reporter,
    UploadBuffer, WordChunker,
};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "glean")]
#[command(about = "Extract plain text from web pages, PDFs, Word documents and text files")]
#[command(version)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to read from. Exactly one is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Text to use as-is
    #[arg(long)]
    text: Option<String>,

    /// Web page to fetch
    #[arg(long)]
    url: Option<String>,

    /// PDF, DOCX or TXT file to read
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text and show a preview plus entities
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// File type, when the extension doesn't say (pdf, docx, txt)
        #[arg(long, requires = "file")]
        kind: Option<DocumentKind>,

        /// Characters of text to preview (default from config)
        #[arg(long)]
        preview: Option<usize>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract text and split it into fixed-size word chunks
    Chunk {
        #[command(flatten)]
        source: SourceArgs,

        /// File type, when the extension doesn't say (pdf, docx, txt)
        #[arg(long, requires = "file")]
        kind: Option<DocumentKind>,

        /// Words per chunk (default from config)
        #[arg(short, long)]
        size: Option<usize>,

        /// Print chunks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set up the API key
    Init {
        /// Save this key without prompting (for CI/scripting)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the effective configuration and OCR tools
    Info,
}

impl SourceArgs {
    fn into_input(self, kind: Option<DocumentKind>) -> Result<InputDescriptor> {
        if let Some(text) = self.text {
            return Ok(InputDescriptor::InlineText(text));
        }
        if let Some(url) = self.url {
            return Ok(InputDescriptor::Url(url));
        }

        let path = self.file.context("one of --text, --url or --file is required")?;
        let kind = match kind.or_else(|| DocumentKind::from_path(&path)) {
            Some(kind) => kind,
            None => bail!("Cannot tell the type of {:?}; pass --kind pdf|docx|txt", path),
        };
        let buffer = UploadBuffer::from_path(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;

        Ok(InputDescriptor::UploadedFile(buffer, kind))
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "glean=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .init();
}

/// Config file if present, defaults otherwise
fn load_config() -> Result<Config> {
    Ok(Config::load()?.unwrap_or_default())
}

/// Run one request through the pipeline with a "Processing..." phase
async fn run_pipeline(
    pipeline: &Pipeline,
    input: InputDescriptor,
    reporter: &mut Reporter,
) -> ExtractionResult {
    reporter.start_phase("Processing");
    let result = pipeline.run(input, reporter).await;
    reporter.finish_phase();
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        None => {
            // No command = show info, or run init on first run
            match Config::load()? {
                Some(config) => show_info(Some(&config)),
                None => {
                    show_welcome();
                    match run_init(None)? {
                        InitResult::Configured(_) => {
                            println!(
                                "\n{} Configuration saved! Run 'glean --help' to get started.",
                                "✓".green()
                            );
                        }
                        InitResult::Cancelled => {
                            println!("\nSetup cancelled.");
                        }
                    }
                }
            }
        }

        Some(Commands::Extract { source, kind, preview, json }) => {
            let config = load_config()?;
            let genai = GenAiConfig::from_env(&config)?;
            let input = source.into_input(kind)?;

            let pipeline = Pipeline::from_config(&config)?;
            let mut reporter = Reporter::new();
            let result = run_pipeline(&pipeline, input, &mut reporter).await;

            let entities = if result.text.trim().is_empty() {
                Vec::new()
            } else {
                PlaceholderExtractor::new(&genai)
                    .extract_entities(&result.text)
                    .await?
            };

            if json {
                let output = serde_json::json!({
                    "text": result.text,
                    "warnings": result.warnings,
                    "used_ocr": result.used_ocr,
                    "error": result.error.as_ref().map(|e| e.to_string()),
                    "entities": entities,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if result.text.trim().is_empty() {
                if result.is_ok() {
                    reporter.fail("No text extracted from the input.");
                }
            } else {
                let preview_chars = preview.unwrap_or(config.preview_chars);
                let shown = result.preview(preview_chars);
                println!("{}", shown);
                if shown.len() < result.text.len() {
                    let remaining = result.text.chars().count() - preview_chars;
                    println!("{}", format!("[... {} more characters]", remaining).dimmed());
                }

                println!("\n{}", "Entities:".bold());
                println!("{}", serde_json::to_string_pretty(&entities)?);
            }

            if !result.is_ok() {
                std::process::exit(1);
            }
        }

        Some(Commands::Chunk { source, kind, size, json }) => {
            let config = load_config()?;
            GenAiConfig::from_env(&config)?;
            let chunker = WordChunker::new(size.unwrap_or(config.chunk_size))?;
            let input = source.into_input(kind)?;

            let pipeline = Pipeline::from_config(&config)?;
            let mut reporter = Reporter::new();
            let result = run_pipeline(&pipeline, input, &mut reporter).await;

            if let Some(err) = result.error {
                return Err(err).context("Nothing to chunk");
            }

            let chunks = chunker.chunk(&result.text);
            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else if chunks.is_empty() {
                reporter.fail("No text extracted from the input.");
            } else {
                for chunk in &chunks {
                    println!("{}", format!("[{}] {} words", chunk.index, chunk.word_count).bold());
                    println!("{}\n", chunk.text);
                }
                reporter.success(&format!(
                    "{} chunks of up to {} words",
                    chunks.len(),
                    chunker.chunk_size()
                ));
            }
        }

        Some(Commands::Init { api_key }) => {
            // Non-interactive mode for CI/scripting
            if let Some(api_key) = api_key {
                let mut config = load_config()?;
                GenAiConfig::new(api_key.as_str(), config.model.as_str())?;
                config.api_key = Some(api_key);
                config.save()?;
                println!("Configuration saved to {:?}", Config::path()?);
                return Ok(());
            }

            let existing = Config::load()?;
            match run_init(existing.as_ref())? {
                InitResult::Configured(_) => {
                    println!("\n{} Configuration saved!", "✓".green());
                }
                InitResult::Cancelled => {
                    println!("\nSetup cancelled.");
                }
            }
        }

        Some(Commands::Info) => {
            show_info(Config::load()?.as_ref());
        }
    }

    Ok(())
}
