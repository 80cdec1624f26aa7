//! Character offset to line/column mapping

use super::types::Chunk;

/// Maps character offsets of a normalized document to 1-based line/column pairs
#[derive(Debug, Clone)]
pub struct PositionMapper {
    /// Character offsets of every '\n', ascending
    newline_offsets: Vec<usize>,
}

impl PositionMapper {
    pub fn new(normalized_text: &str) -> Self {
        let newline_offsets = normalized_text
            .chars()
            .enumerate()
            .filter_map(|(offset, c)| (c == '\n').then_some(offset))
            .collect();
        Self { newline_offsets }
    }

    /// Number of lines in the document (a trailing newline opens a new, empty line)
    pub fn line_count(&self) -> usize {
        self.newline_offsets.len() + 1
    }

    /// Line is 1 + newlines strictly before `offset`; column counts from the
    /// nearest preceding newline, or from the document start
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let newlines_before = self.newline_offsets.partition_point(|&nl| nl < offset);
        let column = match newlines_before {
            0 => offset + 1,
            n => offset - self.newline_offsets[n - 1],
        };
        (newlines_before + 1, column)
    }

    /// Fill in start/end line and column of every chunk from its positions
    pub fn annotate(&self, chunks: &mut [Chunk]) {
        for chunk in chunks.iter_mut() {
            (chunk.start_line, chunk.start_column) = self.line_column(chunk.start_position);
            (chunk.end_line, chunk.end_column) = self.line_column(chunk.end_position);
        }
    }
}
