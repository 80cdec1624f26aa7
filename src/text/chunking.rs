//! Recursive text chunking with word-safe overlap
//!
//! Documents are cut at the most significant separator that keeps each chunk
//! within the size limit (paragraphs, then sentences, clauses, words and
//! finally characters). Every chunk carries its character range and
//! line/column coordinates in the line-ending-normalized document.

pub mod chunker;
pub mod config;
pub mod error;
pub mod line_ending;
pub mod overlap;
pub mod position;
pub mod splitter;
pub mod types;

// Re-export main public interfaces
pub use chunker::RecursiveChunker;
pub use config::{ChunkingStatistics, DEFAULT_SEPARATORS, RecursiveChunkingConfig};
pub use error::{ChunkingError, Result};
pub use line_ending::LineEnding;
pub use overlap::OverlapCalculator;
pub use position::PositionMapper;
pub use types::{BoundaryKind, Chunk};

fn chunker_for(
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Option<&[&str]>,
) -> Result<RecursiveChunker> {
    let mut config = RecursiveChunkingConfig::new(chunk_size).with_overlap(chunk_overlap);
    if let Some(separators) = separators {
        config = config.with_separators(separators.iter().copied());
    }
    RecursiveChunker::new(config)
}

/// Split `text` into plain text chunks.
///
/// `separators` of `None` or an empty slice selects [`DEFAULT_SEPARATORS`].
/// Fails with [`ChunkingError::InvalidArgument`] before doing any work when
/// `chunk_size` is 0 or `chunk_overlap >= chunk_size`.
pub fn split(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Option<&[&str]>,
) -> Result<Vec<String>> {
    Ok(chunker_for(chunk_size, chunk_overlap, separators)?.chunk(text))
}

/// Split `text` into annotated chunks. See [`split`] for the arguments.
pub fn split_with_metadata(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Option<&[&str]>,
) -> Result<Vec<Chunk>> {
    Ok(chunker_for(chunk_size, chunk_overlap, separators)?.chunk_with_metadata(text))
}
