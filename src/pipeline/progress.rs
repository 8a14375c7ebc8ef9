//! User-facing status output for the extraction pipeline
//!
//! Phases, warnings and errors go to stderr so stdout stays clean for the
//! extracted text and entity records.

use colored::Colorize;
use std::error::Error;
use std::io::{self, Write};

/// Reports progress, warnings and errors to the user
pub struct Reporter {
    /// Current phase name
    current_phase: Option<String>,
    /// Number of warnings shown
    warnings: usize,
    /// Number of errors shown
    errors: usize,
    /// Whether to show output (false for tests/quiet mode)
    show_output: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            current_phase: None,
            warnings: 0,
            errors: 0,
            show_output: true,
        }
    }

    /// Create a quiet reporter (no output)
    pub fn quiet() -> Self {
        Self {
            show_output: false,
            ..Self::new()
        }
    }

    /// Start a new phase of processing
    pub fn start_phase(&mut self, phase: &str) {
        self.current_phase = Some(phase.to_string());
        if self.show_output {
            eprint!("{}... ", phase.bold());
            let _ = io::stderr().flush();
        }
    }

    /// Finish the current phase
    pub fn finish_phase(&mut self) {
        if self.show_output && self.current_phase.is_some() {
            eprintln!("{}", "done".green());
        }
        self.current_phase = None;
    }

    /// Abandon the current phase, leaving the line for the message that follows
    fn break_phase(&mut self) {
        if self.show_output && self.current_phase.is_some() {
            eprintln!();
        }
        self.current_phase = None;
    }

    pub fn warn(&mut self, message: &str) {
        self.break_phase();
        self.warnings += 1;
        if self.show_output {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        }
    }

    /// Show an error together with its full source chain
    pub fn error(&mut self, context: &str, err: &dyn Error) {
        self.break_phase();
        self.errors += 1;
        if self.show_output {
            eprintln!("{} {}: {}", "error:".red().bold(), context, err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", "caused by:".red(), cause);
                source = cause.source();
            }
        }
    }

    /// Show an error that has no underlying error value
    pub fn fail(&mut self, message: &str) {
        self.break_phase();
        self.errors += 1;
        if self.show_output {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
    }

    pub fn success(&mut self, message: &str) {
        if self.show_output {
            eprintln!("{} {}", "✓".green(), message);
        }
    }

    pub fn warnings_shown(&self) -> usize {
        self.warnings
    }

    pub fn errors_shown(&self) -> usize {
        self.errors
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn test_phases() {
        let mut reporter = Reporter::quiet();

        reporter.start_phase("Processing");
        assert!(reporter.current_phase.is_some());

        reporter.finish_phase();
        assert!(reporter.current_phase.is_none());
    }

    #[test]
    fn test_counts() {
        let mut reporter = Reporter::quiet();

        reporter.start_phase("Processing");
        reporter.warn("PDF contains no extractable text. Using OCR...");
        assert!(reporter.current_phase.is_none());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        reporter.error("Error extracting text from PDF", &ExtractError::from(io_err));
        reporter.fail("No text extracted from the input.");

        assert_eq!(reporter.warnings_shown(), 1);
        assert_eq!(reporter.errors_shown(), 2);
    }
}
