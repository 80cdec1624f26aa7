//! Word-safe overlap between consecutive chunks
//!
//! Each chunk after the first is prefixed with a tail of its predecessor's
//! final text. The tail is trimmed so it never starts in the middle of a
//! word, and it is never longer than the configured overlap.

use super::types::Chunk;

/// Overlap calculation and application over a chunk sequence
pub struct OverlapCalculator;

impl OverlapCalculator {
    /// Characters after which an overlap may start
    pub const BOUNDARY_CHARS: [char; 26] = [
        ' ', '\t', '\n', '\u{0C}', '\r', '.', ',', ';', ':', '!', '?', '(', ')', '[', ']', '{',
        '}', '"', '\'', '`', '“', '”', '‘', '’', '«', '»',
    ];

    pub fn is_boundary(c: char) -> bool {
        Self::BOUNDARY_CHARS.contains(&c)
    }

    /// Tail of `text` of at most `max_chars` characters, starting right after
    /// the first boundary character inside it
    ///
    /// Falls back to the untrimmed tail when it holds no boundary, or when the
    /// only boundary is its last character.
    pub fn word_safe_tail(text: &str, max_chars: usize) -> &str {
        if max_chars == 0 {
            return "";
        }

        let total = text.chars().count();
        let skip = total - max_chars.min(total);
        let start = text
            .char_indices()
            .nth(skip)
            .map_or(text.len(), |(byte_idx, _)| byte_idx);
        let candidate = &text[start..];

        match candidate.char_indices().find(|(_, c)| Self::is_boundary(*c)) {
            Some((idx, c)) if idx + c.len_utf8() < candidate.len() => {
                &candidate[idx + c.len_utf8()..]
            }
            _ => candidate,
        }
    }

    /// Prefix every chunk but the first with the word-safe tail of the
    /// previous chunk's final text
    ///
    /// Produces new chunks; `chunk_text` and positions are left as they were.
    pub fn apply(chunks: Vec<Chunk>, chunk_overlap: usize) -> Vec<Chunk> {
        if chunk_overlap == 0 {
            return chunks;
        }

        let mut overlapped: Vec<Chunk> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let next = match overlapped.last() {
                None => chunk,
                Some(previous) => {
                    let overlap_text =
                        Self::word_safe_tail(&previous.text, chunk_overlap).to_string();
                    Chunk {
                        text: format!("{overlap_text}{}", chunk.chunk_text),
                        overlap_text,
                        ..chunk
                    }
                }
            };
            overlapped.push(next);
        }
        overlapped
    }
}
