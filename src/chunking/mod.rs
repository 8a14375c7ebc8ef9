//! Word-count chunking
//!
//! Splits text on whitespace and regroups the words into consecutive runs
//! of `chunk_size` words. Chunks partition the word sequence in order with
//! no overlap; only the last chunk may be shorter.

use crate::error::ChunkError;
use serde::Serialize;

/// Default words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// A run of consecutive words, joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextChunk {
    /// Position in the chunk sequence, starting at 0
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

/// Fixed-size word chunker
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    chunk_size: usize,
}

impl WordChunker {
    pub fn new(chunk_size: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidSize);
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();

        words
            .chunks(self.chunk_size)
            .enumerate()
            .map(|(index, run)| TextChunk {
                index,
                text: run.join(" "),
                word_count: run.len(),
            })
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Split `text` into chunks of at most `chunk_size` words.
pub fn chunk_text(text: &str, chunk_size: usize) -> Result<Vec<String>, ChunkError> {
    Ok(WordChunker::new(chunk_size)?
        .chunk(text)
        .into_iter()
        .map(|c| c.text)
        .collect())
}
