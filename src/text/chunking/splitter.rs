//! Recursive separator-driven splitting
//!
//! Text is cut at the rightmost occurrence of the current separator that keeps
//! the chunk within `chunk_size` characters. Segments that cannot be cut that
//! way are handed to the next, finer separator; the empty separator (or an
//! exhausted hierarchy) falls back to fixed-size character slices.

use tracing::{debug, trace};

use super::types::Chunk;

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// `base_position` is the character offset of `text` in the whole document;
/// every emitted chunk carries absolute positions. Concatenating the
/// `chunk_text` of the result reproduces `text` exactly.
pub fn split_recursive<S: AsRef<str>>(
    text: &str,
    chunk_size: usize,
    separators: &[S],
    separator_index: usize,
    base_position: usize,
) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    let current = separators.get(separator_index).map(AsRef::as_ref);
    let text_len = text.chars().count();
    if text_len <= chunk_size {
        return vec![Chunk::new(
            text.to_string(),
            base_position,
            base_position + text_len,
            current.unwrap_or_default().to_string(),
        )];
    }

    let separator = match current {
        Some(separator) if !separator.is_empty() => separator,
        _ => {
            debug!(
                "Character-level split of {} chars at position {}",
                text_len, base_position
            );
            return split_by_characters(text, chunk_size, base_position);
        }
    };

    let mut chunks = Vec::new();
    let mut rest = text;
    let mut position = base_position;

    while !rest.is_empty() {
        let rest_len = rest.chars().count();
        if rest_len <= chunk_size {
            chunks.push(Chunk::new(
                rest.to_string(),
                position,
                position + rest_len,
                separator.to_string(),
            ));
            break;
        }

        let Some(first) = rest.find(separator) else {
            trace!(
                "Separator {:?} absent from {} remaining chars, descending",
                separator, rest_len
            );
            chunks.extend(split_recursive(
                rest,
                chunk_size,
                separators,
                separator_index + 1,
                position,
            ));
            break;
        };

        // rest_len > chunk_size, so the window end always exists
        let window_end = rest
            .char_indices()
            .nth(chunk_size)
            .map_or(rest.len(), |(byte_idx, _)| byte_idx);

        let cut = match rest[..window_end].rfind(separator) {
            Some(last) => last + separator.len(),
            None => first + separator.len(),
        };
        let piece = &rest[..cut];
        let piece_len = piece.chars().count();

        if cut <= window_end {
            chunks.push(Chunk::new(
                piece.to_string(),
                position,
                position + piece_len,
                separator.to_string(),
            ));
        } else {
            // The segment before the first occurrence is oversized. It is
            // handed down together with the separator so nothing is lost.
            trace!(
                "Segment of {} chars before {:?} exceeds chunk size, descending",
                piece_len, separator
            );
            chunks.extend(split_recursive(
                piece,
                chunk_size,
                separators,
                separator_index + 1,
                position,
            ));
        }

        position += piece_len;
        rest = &rest[cut..];
    }

    chunks
}

/// Cut `text` into consecutive slices of exactly `chunk_size` characters
/// (the last one may be shorter).
pub fn split_by_characters(text: &str, chunk_size: usize, base_position: usize) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(chunk_size.max(1))
        .scan(base_position, |position, slice| {
            let start = *position;
            *position += slice.len();
            Some(Chunk::new(
                slice.iter().collect(),
                start,
                *position,
                String::new(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::chunking::config::DEFAULT_SEPARATORS;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.chunk_text.as_str()).collect()
    }

    #[test]
    fn test_character_level_only() {
        let chunks = split_recursive("aaaaaaaaaa", 3, &[""], 0, 0);
        assert_eq!(texts(&chunks), vec!["aaa", "aaa", "aaa", "a"]);
        assert!(chunks.iter().all(|c| c.separator_used.is_empty()));
        assert_eq!(chunks[3].char_range(), (9, 10));
    }

    #[test]
    fn test_fits_in_one_chunk() {
        let chunks = split_recursive("short text", 20, DEFAULT_SEPARATORS, 0, 0);
        assert_eq!(texts(&chunks), vec!["short text"]);
        assert_eq!(chunks[0].separator_used, "\n\n");
        assert_eq!(chunks[0].char_range(), (0, 10));
    }

    #[test]
    fn test_empty_text() {
        assert!(split_recursive("", 5, DEFAULT_SEPARATORS, 0, 0).is_empty());
    }

    #[test]
    fn test_sentence_boundary_preferred() {
        let chunks = split_recursive("Hello world. Foo bar.", 13, DEFAULT_SEPARATORS, 0, 0);
        assert_eq!(texts(&chunks), vec!["Hello world. ", "Foo bar."]);
        assert_eq!(chunks[0].separator_used, ". ");
        assert_eq!(chunks[1].char_range(), (13, 21));
    }

    #[test]
    fn test_falls_back_to_space_when_sentence_too_long() {
        let chunks = split_recursive("Hello world. Foo bar.", 12, DEFAULT_SEPARATORS, 0, 0);
        assert_eq!(texts(&chunks), vec!["Hello ", "world. ", "Foo bar."]);
        assert_eq!(chunks[0].separator_used, " ");
        assert!(chunks.iter().all(|c| c.chunk_text.chars().count() <= 12));
    }

    #[test]
    fn test_rightmost_separator_fills_chunk() {
        let chunks = split_recursive("a b c d e f g", 6, &[" "], 0, 0);
        assert_eq!(texts(&chunks), vec!["a b c ", "d e f ", "g"]);
    }

    #[test]
    fn test_paragraphs_kept_together() {
        let text = "First paragraph.\n\nSecond one.\n\nThird.";
        let chunks = split_recursive(text, 20, DEFAULT_SEPARATORS, 0, 0);
        assert_eq!(
            texts(&chunks),
            vec!["First paragraph.\n\n", "Second one.\n\nThird."]
        );
        assert!(chunks.iter().all(|c| c.separator_used == "\n\n"));
    }

    #[test]
    fn test_oversized_segment_descends_and_keeps_separator() {
        let chunks = split_recursive("abcdefgh||xy", 4, &["||", ""], 0, 0);
        assert_eq!(texts(&chunks), vec!["abcd", "efgh", "||", "xy"]);
        assert_eq!(chunks[0].separator_used, "");
        assert_eq!(chunks[3].separator_used, "||");
        assert_eq!(chunks[3].char_range(), (10, 12));
    }

    #[test]
    fn test_separator_longer_than_chunk_size() {
        let chunks = split_recursive("<<<>>>abcdef", 2, &["<<<>>>", ""], 0, 0);
        assert_eq!(texts(&chunks), vec!["<<", "<>", ">>", "ab", "cd", "ef"]);
    }

    #[test]
    fn test_exhausted_hierarchy_uses_characters() {
        let chunks = split_recursive("abcdefg", 3, &["|"], 0, 0);
        assert_eq!(texts(&chunks), vec!["abc", "def", "g"]);
        assert!(chunks.iter().all(|c| c.separator_used.is_empty()));
    }

    #[test]
    fn test_base_position_is_added() {
        let chunks = split_recursive("ab cd", 3, &[" "], 0, 100);
        assert_eq!(texts(&chunks), vec!["ab ", "cd"]);
        assert_eq!(chunks[0].char_range(), (100, 103));
        assert_eq!(chunks[1].char_range(), (103, 105));
    }

    #[test]
    fn test_multibyte_sizes_count_characters() {
        let chunks = split_recursive("あいう えおか", 4, &[" ", ""], 0, 0);
        assert_eq!(texts(&chunks), vec!["あいう ", "えおか"]);
        assert_eq!(chunks[1].char_range(), (4, 7));

        let chunks = split_by_characters("😁😁😁😁😁", 2, 0);
        assert_eq!(texts(&chunks), vec!["😁😁", "😁😁", "😁"]);
    }

    #[test]
    fn test_chunks_are_contiguous() {
        let text = "Line one.\nLine two is a bit longer; it has clauses, too.\n\nNew paragraph here!";
        let chunks = split_recursive(text, 15, DEFAULT_SEPARATORS, 0, 0);

        let joined: String = chunks.iter().map(|c| c.chunk_text.as_str()).collect();
        assert_eq!(joined, text);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end_position, pair[1].start_position);
        }
        assert!(chunks.iter().all(|c| c.chunk_text.chars().count() <= 15));
    }
}
