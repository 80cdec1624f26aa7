//! Line ending detection and normalization
//!
//! Splitting always runs on LF text. The detected style is restored on the
//! text fields of the finished chunks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use super::types::Chunk;

static LINE_BREAK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("line break pattern is valid"));

/// Line ending convention of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    /// Detect the style by priority: any CRLF, then any bare CR, else LF
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else if text.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Convert every line break (CRLF, CR or LF) to LF
    pub fn normalize(text: &str) -> Cow<'_, str> {
        LINE_BREAK_REGEX.replace_all(text, "\n")
    }

    /// Convert LF line breaks back to this style
    pub fn restore<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Lf => Cow::Borrowed(text),
            _ if !text.contains('\n') => Cow::Borrowed(text),
            _ => Cow::Owned(text.replace('\n', self.as_str())),
        }
    }

    /// Restore this style on every text-bearing field of the chunks
    pub fn restore_chunks(&self, chunks: &mut [Chunk]) {
        if *self == Self::Lf {
            return;
        }
        for chunk in chunks.iter_mut() {
            for field in [
                &mut chunk.text,
                &mut chunk.overlap_text,
                &mut chunk.chunk_text,
            ] {
                *field = field.replace('\n', self.as_str());
            }
        }
    }
}
