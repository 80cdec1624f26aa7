//! Configuration and statistics for recursive text chunking

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::error::{ChunkingError, Result};
use super::line_ending::LineEnding;
use super::types::{BoundaryKind, Chunk};

/// Default separator hierarchy, most significant boundary first.
///
/// The trailing empty string selects character-level splitting.
pub const DEFAULT_SEPARATORS: &[&str] = &[
    "\n\n", // paragraph
    ".\n", "!\n", "?\n", ":\n", ";\n", // sentence or clause at line end
    "\n", // line
    ". ", "! ", "? ", // sentence
    "; ", ", ", // clause
    " ",  // word
    "",   // character
];

/// Configuration for recursive text chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecursiveChunkingConfig {
    /// Maximum characters per chunk, before overlap is added
    pub chunk_size: usize,
    /// Maximum characters carried over from the previous chunk
    #[serde(default)]
    pub chunk_overlap: usize,
    /// Separator hierarchy; `None` or empty selects `DEFAULT_SEPARATORS`
    #[serde(default)]
    pub separators: Option<Vec<String>>,
}

impl Default for RecursiveChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 0,
            separators: None,
        }
    }
}

impl RecursiveChunkingConfig {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }

    pub fn with_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = Some(separators.into_iter().map(Into::into).collect());
        self
    }

    /// Create configuration for embedding input: default hierarchy with ~10% overlap
    pub fn for_embedding(chunk_size: usize) -> Self {
        Self::new(chunk_size).with_overlap(chunk_size / 10)
    }

    /// Create configuration that only cuts fixed-size character slices
    pub fn for_characters(chunk_size: usize) -> Self {
        Self::new(chunk_size).with_separators([""])
    }

    /// Read `CHUNKING_CHUNK_SIZE`, `CHUNKING_CHUNK_OVERLAP` and
    /// `CHUNKING_SEPARATORS` (comma separated, taken literally)
    pub fn from_env() -> Result<Self> {
        let config = envy::prefixed("CHUNKING_").from_env::<Self>()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkingError::invalid_argument(
                "chunk_size must be greater than 0",
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkingError::invalid_argument(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        Ok(())
    }

    /// Effective separator hierarchy for a split call
    pub fn separators(&self) -> Vec<&str> {
        match &self.separators {
            Some(separators) if !separators.is_empty() => {
                separators.iter().map(String::as_str).collect()
            }
            _ => DEFAULT_SEPARATORS.to_vec(),
        }
    }
}

/// Performance and statistical information for chunking operations
#[derive(Debug, Clone, Default)]
pub struct ChunkingStatistics {
    /// Total processing time
    pub total_processing_time: Duration,
    pub normalization_time: Duration,
    pub splitting_time: Duration,
    pub overlap_time: Duration,
    pub position_mapping_time: Duration,

    /// Input text statistics
    pub documents_processed: usize,
    pub input_char_count: usize,
    pub input_line_count: usize,
    pub last_line_ending: LineEnding,

    /// Output chunk statistics
    pub total_chunks_created: usize,
    pub chunks_by_boundary: HashMap<BoundaryKind, usize>,
    pub max_chunk_chars: usize,
    pub min_chunk_chars: usize,
    pub avg_chunk_chars: f32,
    pub total_overlap_chars: usize,

    /// Share of chunks cut at a sentence or larger boundary
    pub boundary_preservation_rate: f32,
    pub chars_per_second: f32,
}

impl ChunkingStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing for total processing
    pub fn start_total_timing(&self) -> Instant {
        Instant::now()
    }

    /// Finish total timing
    pub fn finish_total_timing(&mut self, start: Instant) {
        self.total_processing_time += start.elapsed();
    }

    pub fn record_normalization_time(&mut self, duration: Duration) {
        self.normalization_time += duration;
    }

    pub fn record_splitting_time(&mut self, duration: Duration) {
        self.splitting_time += duration;
    }

    pub fn record_overlap_time(&mut self, duration: Duration) {
        self.overlap_time += duration;
    }

    pub fn record_position_mapping_time(&mut self, duration: Duration) {
        self.position_mapping_time += duration;
    }

    /// Record input document statistics
    pub fn record_input_stats(
        &mut self,
        char_count: usize,
        line_count: usize,
        line_ending: LineEnding,
    ) {
        self.documents_processed += 1;
        self.input_char_count += char_count;
        self.input_line_count += line_count;
        self.last_line_ending = line_ending;
    }

    /// Record the finished chunks of one document
    pub fn record_chunks(&mut self, chunks: &[Chunk]) {
        for chunk in chunks {
            self.total_chunks_created += 1;
            *self
                .chunks_by_boundary
                .entry(chunk.boundary_kind())
                .or_insert(0) += 1;
            self.total_overlap_chars += chunk.overlap_text.chars().count();
        }

        let (min, max) = match chunks.iter().map(Chunk::char_length).minmax() {
            MinMaxResult::NoElements => return,
            MinMaxResult::OneElement(len) => (len, len),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        self.max_chunk_chars = self.max_chunk_chars.max(max);
        self.min_chunk_chars = if self.min_chunk_chars == 0 {
            min
        } else {
            self.min_chunk_chars.min(min)
        };
    }

    /// Number of chunks cut at the given boundary kind
    pub fn chunks_with_boundary(&self, kind: &BoundaryKind) -> usize {
        self.chunks_by_boundary.get(kind).copied().unwrap_or(0)
    }

    /// Calculate derived metrics (call this after all processing is complete)
    pub fn calculate_derived_metrics(&mut self) {
        if self.total_chunks_created > 0 {
            self.avg_chunk_chars = self.input_char_count as f32 / self.total_chunks_created as f32;

            let preserving: usize = self
                .chunks_by_boundary
                .iter()
                .filter(|(kind, _)| kind.preserves_boundaries())
                .map(|(_, count)| count)
                .sum();
            self.boundary_preservation_rate =
                preserving as f32 / self.total_chunks_created as f32;
        }

        let total_seconds = self.total_processing_time.as_secs_f32();
        if total_seconds > 0.0 {
            self.chars_per_second = self.input_char_count as f32 / total_seconds;
        }
    }

    /// Get summary as string for logging
    pub fn summary(&self) -> String {
        format!(
            "Chunking Stats: {} docs, {} chars -> {} chunks ({:.1} avg chars/chunk, {}..{}) in {:.2}ms | \
            Boundary preservation: {:.1}%, forced splits: {} | Overlap: {} chars | Speed: {:.0} chars/s",
            self.documents_processed,
            self.input_char_count,
            self.total_chunks_created,
            self.avg_chunk_chars,
            self.min_chunk_chars,
            self.max_chunk_chars,
            self.total_processing_time.as_secs_f64() * 1000.0,
            self.boundary_preservation_rate * 100.0,
            self.chunks_with_boundary(&BoundaryKind::Character),
            self.total_overlap_chars,
            self.chars_per_second,
        )
    }
}
