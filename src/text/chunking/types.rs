//! Core data structures for recursive text chunking

use serde::{Deserialize, Serialize};

/// One chunk of a split document.
///
/// Positions are 0-based character offsets (start inclusive, end exclusive)
/// into the line-ending-normalized document and always describe
/// `chunk_text`, never the prepended overlap. Line and column numbers are
/// 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Final content: `overlap_text` followed by `chunk_text`
    pub text: String,
    /// Prefix of `text` carried over from the previous chunk
    pub overlap_text: String,
    /// The chunk's own content as produced by the splitter
    pub chunk_text: String,
    /// Character start position of `chunk_text`
    pub start_position: usize,
    /// Character end position of `chunk_text` (exclusive)
    pub end_position: usize,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    /// Separator that produced this chunk's boundary ("" for character level)
    pub separator_used: String,
    /// Index of this chunk in the sequence
    pub chunk_index: usize,
}

impl Chunk {
    /// Create a chunk straight out of the splitter: no overlap, no line data yet
    pub fn new(
        chunk_text: String,
        start_position: usize,
        end_position: usize,
        separator_used: String,
    ) -> Self {
        Self {
            text: chunk_text.clone(),
            overlap_text: String::new(),
            chunk_text,
            start_position,
            end_position,
            start_line: 0,
            start_column: 0,
            end_line: 0,
            end_column: 0,
            separator_used,
            chunk_index: 0,
        }
    }

    /// Get the length of the chunk's own content in characters
    pub fn char_length(&self) -> usize {
        self.end_position - self.start_position
    }

    /// Get character position range as a tuple
    pub fn char_range(&self) -> (usize, usize) {
        (self.start_position, self.end_position)
    }

    /// Check if this chunk is empty
    pub fn is_empty(&self) -> bool {
        self.chunk_text.is_empty()
    }

    pub fn has_overlap(&self) -> bool {
        !self.overlap_text.is_empty()
    }

    /// Classify the separator that produced this chunk
    pub fn boundary_kind(&self) -> BoundaryKind {
        BoundaryKind::from_separator(&self.separator_used)
    }
}

/// Kind of boundary a chunk was cut at, derived from its separator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// Blank line between paragraphs
    Paragraph,
    /// Sentence or clause punctuation at the end of a line
    SentenceLine,
    /// Bare line break
    Line,
    /// Sentence-ending punctuation followed by a space
    Sentence,
    /// Clause punctuation followed by a space
    Clause,
    /// Single space between words
    Word,
    /// Forced character-level cut
    Character,
    /// Caller-supplied separator outside the default hierarchy
    Custom(String),
}

impl BoundaryKind {
    pub fn from_separator(separator: &str) -> Self {
        match separator {
            "" => Self::Character,
            "\n\n" => Self::Paragraph,
            ".\n" | "!\n" | "?\n" | ":\n" | ";\n" => Self::SentenceLine,
            "\n" => Self::Line,
            ". " | "! " | "? " => Self::Sentence,
            "; " | ", " => Self::Clause,
            " " => Self::Word,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Check if this kind keeps a sentence or larger unit intact
    pub fn preserves_boundaries(&self) -> bool {
        matches!(
            self,
            Self::Paragraph | Self::SentenceLine | Self::Line | Self::Sentence
        )
    }

    /// Check if this kind required forced character splitting
    pub fn is_forced_split(&self) -> bool {
        matches!(self, Self::Character)
    }

    /// Get a human-readable description of the boundary kind
    pub fn description(&self) -> &'static str {
        match self {
            Self::Paragraph => "Paragraph break",
            Self::SentenceLine => "Sentence end at line break",
            Self::Line => "Line break",
            Self::Sentence => "Sentence end",
            Self::Clause => "Clause punctuation",
            Self::Word => "Word boundary",
            Self::Character => "Forced character split",
            Self::Custom(_) => "Custom separator",
        }
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Custom(separator) => write!(f, "Custom({separator:?})"),
            _ => write!(f, "{}", self.description()),
        }
    }
}
