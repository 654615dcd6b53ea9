//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveChunker`], a
//! separator-priority splitter: it prefers paragraph breaks, then line
//! breaks, then sentence terminators, then spaces, and hard-cuts by
//! character count only when nothing structural fits.

use crate::document::Chunk;
use crate::error::{QaError, Result};

/// A strategy for splitting document text into chunks.
///
/// Implementations must be deterministic: the same text always yields the
/// same chunk sequence, ordered from the start of the document.
pub trait Chunker: Send + Sync {
    /// Split text into an ordered sequence of chunks.
    ///
    /// Returns an empty `Vec` for empty text.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Separators tried largest-first when splitting. The hard character cut is
/// the implicit final fallback.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

/// Splits text at the largest separator that keeps pieces within the size
/// bound, then stitches consecutive pieces with overlapping trailing context.
///
/// Sizes are byte lengths; cuts never land inside a UTF-8 sequence. Every
/// chunk is at most `chunk_size` long, overlap included. The one exception
/// is a single character wider than the size bound, which is emitted whole.
///
/// # Example
///
/// ```rust,ignore
/// use pdfqa::RecursiveChunker;
///
/// let chunker = RecursiveChunker::new(1000, 100)?;
/// let chunks = chunker.chunk(&document.text);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] unless `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(QaError::Config("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(QaError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }
        if text.len() <= self.chunk_size {
            return vec![Chunk { text: text.to_string(), index: 0 }];
        }

        // Pieces are budgeted to leave room for the overlap prefix, so the
        // stitched chunks still respect `chunk_size`.
        let budget = self.chunk_size - self.chunk_overlap;
        let pieces = split_to_budget(text, budget, &SEPARATORS);

        pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| {
                let text = if i == 0 || self.chunk_overlap == 0 {
                    (*piece).to_string()
                } else {
                    let carry = tail(pieces[i - 1], self.chunk_overlap);
                    format!("{carry}{piece}")
                };
                Chunk { text, index: i }
            })
            .collect()
    }
}

/// Split text into pieces of at most `budget` bytes, trying each separator
/// in priority order. The pieces are an exact partition of the input.
fn split_to_budget<'a>(text: &'a str, budget: usize, separators: &[&str]) -> Vec<&'a str> {
    if text.len() <= budget {
        return vec![text];
    }
    let Some((&separator, rest)) = separators.split_first() else {
        return hard_cut(text, budget);
    };

    let mut pieces = Vec::new();
    // Byte span of the piece being accumulated.
    let mut cur_start = 0;
    let mut cur_end = 0;

    let flush = |pieces: &mut Vec<&'a str>, start: usize, end: usize| {
        if start == end {
            return;
        }
        let piece = &text[start..end];
        if piece.len() > budget {
            // A single segment exceeded the budget; descend to the next
            // separator level.
            pieces.extend(split_to_budget(piece, budget, rest));
        } else {
            pieces.push(piece);
        }
    };

    for (seg_start, seg_end) in split_spans(text, separator) {
        if cur_end == cur_start {
            cur_start = seg_start;
            cur_end = seg_end;
        } else if cur_end - cur_start + (seg_end - seg_start) <= budget {
            cur_end = seg_end;
        } else {
            flush(&mut pieces, cur_start, cur_end);
            cur_start = seg_start;
            cur_end = seg_end;
        }
    }
    flush(&mut pieces, cur_start, cur_end);

    pieces
}

/// Byte spans of segments split at `separator`, with the separator kept
/// attached to the preceding segment so the spans tile the whole input.
fn split_spans(text: &str, separator: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        spans.push((start, end));
        start = end;
    }

    if start < text.len() {
        spans.push((start, text.len()));
    }

    spans
}

/// Cut text every `budget` bytes, snapping to character boundaries.
///
/// A character wider than the budget is emitted whole rather than split.
fn hard_cut(text: &str, budget: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + budget).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end <= start {
            end = start + 1;
            while !text.is_char_boundary(end) {
                end += 1;
            }
        }
        pieces.push(&text[start..end]);
        start = end;
    }

    pieces
}

/// The final `n` bytes of `s`, snapped forward to a character boundary.
fn tail(s: &str, n: usize) -> &str {
    if s.len() <= n {
        return s;
    }
    let mut start = s.len() - n;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
