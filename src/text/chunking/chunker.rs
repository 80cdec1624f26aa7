//! Recursive chunker: normalization, splitting, overlap and position mapping

use std::time::Instant;
use tracing::{debug, info};

use super::{
    config::{ChunkingStatistics, RecursiveChunkingConfig},
    error::Result,
    line_ending::LineEnding,
    overlap::OverlapCalculator,
    position::PositionMapper,
    splitter::split_recursive,
    types::Chunk,
};

/// Recursive text chunker with a validated configuration
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    config: RecursiveChunkingConfig,
    /// Performance and statistics tracking
    statistics: ChunkingStatistics,
}

impl RecursiveChunker {
    /// Create a new chunker, rejecting invalid configurations up front
    pub fn new(config: RecursiveChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            statistics: ChunkingStatistics::new(),
        })
    }

    /// Create a chunker from `CHUNKING_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(RecursiveChunkingConfig::from_env()?)
    }

    /// Split `text` into the final text of each chunk
    pub fn chunk(&mut self, text: &str) -> Vec<String> {
        self.chunk_with_metadata(text)
            .into_iter()
            .map(|chunk| chunk.text)
            .collect()
    }

    /// Split `text` into fully annotated chunks
    pub fn chunk_with_metadata(&mut self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        debug!(
            "Starting recursive chunking for text of {} bytes (chunk_size={}, chunk_overlap={})",
            text.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );
        let total_start = self.statistics.start_total_timing();

        // Step 1: normalize line endings, once per call
        let normalize_start = Instant::now();
        let line_ending = LineEnding::detect(text);
        let normalized = LineEnding::normalize(text);
        self.statistics
            .record_normalization_time(normalize_start.elapsed());
        debug!("Detected {:?} line endings", line_ending);

        // Step 2: recursive split against the separator hierarchy
        let split_start = Instant::now();
        let separators = self.config.separators();
        let chunks = split_recursive(&normalized, self.config.chunk_size, &separators, 0, 0);
        self.statistics.record_splitting_time(split_start.elapsed());
        debug!("Split into {} raw chunks", chunks.len());

        // Step 3: word-safe overlap
        let overlap_start = Instant::now();
        let mut chunks = OverlapCalculator::apply(chunks, self.config.chunk_overlap);
        self.statistics.record_overlap_time(overlap_start.elapsed());

        // Step 4: indices and line/column coordinates
        let position_start = Instant::now();
        let mapper = PositionMapper::new(&normalized);
        for (idx, chunk) in chunks.iter_mut().enumerate() {
            chunk.chunk_index = idx;
        }
        mapper.annotate(&mut chunks);
        self.statistics
            .record_position_mapping_time(position_start.elapsed());

        // Step 5: restore the document's own line endings in text fields
        line_ending.restore_chunks(&mut chunks);

        self.statistics.record_input_stats(
            normalized.chars().count(),
            mapper.line_count(),
            line_ending,
        );
        self.statistics.record_chunks(&chunks);
        self.statistics.finish_total_timing(total_start);
        self.statistics.calculate_derived_metrics();

        info!("Recursive chunking completed: {} chunks", chunks.len());
        debug!("{}", self.statistics.summary());

        chunks
    }

    /// Chunk several documents independently with the same configuration
    pub fn batch_chunk_with_metadata(&mut self, texts: &[&str]) -> Vec<Vec<Chunk>> {
        info!("Starting batch chunking of {} documents", texts.len());
        texts
            .iter()
            .map(|text| self.chunk_with_metadata(text))
            .collect()
    }

    /// Get current configuration
    pub fn config(&self) -> &RecursiveChunkingConfig {
        &self.config
    }

    /// Get processing statistics
    pub fn statistics(&self) -> &ChunkingStatistics {
        &self.statistics
    }

    /// Reset statistics
    pub fn reset_statistics(&mut self) {
        self.statistics = ChunkingStatistics::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::chunking::{error::ChunkingError, types::BoundaryKind};
    use crate::util::tracing::tracing_init_test;

    #[test]
    fn test_chunker_creation() {
        let chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(100)).unwrap();
        assert_eq!(chunker.config().chunk_size, 100);
        assert_eq!(chunker.statistics().total_chunks_created, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = RecursiveChunker::new(RecursiveChunkingConfig::new(5).with_overlap(5));
        assert!(matches!(result, Err(ChunkingError::InvalidArgument(_))));

        let result = RecursiveChunker::new(RecursiveChunkingConfig::new(0));
        assert!(matches!(result, Err(ChunkingError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_text() {
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(10)).unwrap();
        assert!(chunker.chunk("").is_empty());
        assert!(chunker.chunk_with_metadata("").is_empty());
    }

    #[test]
    fn test_metadata_fields() {
        tracing_init_test(tracing::Level::DEBUG);
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(10)).unwrap();
        let chunks = chunker.chunk_with_metadata("one two\nthree four");

        let texts: Vec<&str> = chunks.iter().map(|c| c.chunk_text.as_str()).collect();
        assert_eq!(texts, vec!["one two\n", "three four"]);

        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].char_range(), (0, 8));
        assert_eq!((chunks[0].start_line, chunks[0].start_column), (1, 1));
        assert_eq!((chunks[0].end_line, chunks[0].end_column), (2, 1));
        assert_eq!(chunks[0].separator_used, "\n");

        assert_eq!(chunks[1].chunk_index, 1);
        assert_eq!(chunks[1].char_range(), (8, 18));
        assert_eq!((chunks[1].start_line, chunks[1].start_column), (2, 1));
        assert_eq!((chunks[1].end_line, chunks[1].end_column), (2, 11));
    }

    #[test]
    fn test_crlf_restored_in_output() {
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(10)).unwrap();
        let chunks = chunker.chunk_with_metadata("one two\r\nthree four");

        assert_eq!(chunks[0].chunk_text, "one two\r\n");
        assert_eq!(chunks[0].text, "one two\r\n");
        // positions refer to the normalized text
        assert_eq!(chunks[0].char_range(), (0, 8));
        assert_eq!(chunks[1].char_range(), (8, 18));
        assert_eq!(chunker.statistics().last_line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_old_mac_line_endings() {
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(4)).unwrap();
        let texts = chunker.chunk("ab\rcd\ref");
        assert_eq!(texts, vec!["ab\r", "cd\r", "ef"]);
    }

    #[test]
    fn test_overlap_in_pipeline() {
        let config = RecursiveChunkingConfig::new(12).with_overlap(6);
        let mut chunker = RecursiveChunker::new(config).unwrap();
        let chunks = chunker.chunk_with_metadata("alpha beta gamma delta");

        assert_eq!(chunks[0].chunk_text, "alpha beta ");
        assert_eq!(chunks[0].overlap_text, "");
        assert_eq!(chunks[1].chunk_text, "gamma delta");
        assert_eq!(chunks[1].overlap_text, "beta ");
        assert_eq!(chunks[1].text, "beta gamma delta");
        assert_eq!(chunks[1].char_range(), (11, 22));
        assert_eq!(chunks[1].boundary_kind(), BoundaryKind::Word);
    }

    #[test]
    fn test_statistics_collection() {
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(20)).unwrap();
        let text = "First paragraph.\n\nSecond paragraph with more content.";
        let chunks = chunker.chunk_with_metadata(text);

        let stats = chunker.statistics();
        assert_eq!(stats.total_chunks_created, chunks.len());
        assert_eq!(stats.input_char_count, text.chars().count());
        assert_eq!(stats.input_line_count, 3);
        assert_eq!(stats.documents_processed, 1);
        assert!(stats.max_chunk_chars <= 20);

        chunker.reset_statistics();
        assert_eq!(chunker.statistics().total_chunks_created, 0);
    }

    #[test]
    fn test_batch_processing() {
        let mut chunker = RecursiveChunker::new(RecursiveChunkingConfig::new(5)).unwrap();
        let results = chunker.batch_chunk_with_metadata(&["abc def", "", "xyz"]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 2);
        assert!(results[1].is_empty());
        assert_eq!(results[2][0].chunk_text, "xyz");
        // every document starts from position 0 and index 0
        assert_eq!(results[2][0].char_range(), (0, 3));
        assert_eq!(results[2][0].chunk_index, 0);
        assert_eq!(chunker.statistics().documents_processed, 2);
    }
}
