//! Unit and property tests for the recursive chunker.

use pdfqa::chunking::{Chunker, RecursiveChunker};
use pdfqa::document::Chunk;
use pdfqa::error::QaError;
use proptest::prelude::*;

/// Strip the overlap prefix from each chunk and reassemble the original text.
///
/// Also asserts that every chunk after the first actually starts with the
/// trailing `overlap` bytes of the previous chunk's content region.
fn reconstruct(chunks: &[Chunk], overlap: usize) -> Option<String> {
    let mut pieces: Vec<String> = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 || overlap == 0 {
            pieces.push(chunk.text.clone());
        } else {
            let prev = &pieces[i - 1];
            let carry_len = prev.len().min(overlap);
            let carry = &prev[prev.len() - carry_len..];
            if !chunk.text.starts_with(carry) {
                return None;
            }
            pieces.push(chunk.text[carry.len()..].to_string());
        }
    }
    Some(pieces.concat())
}

#[test]
fn empty_text_yields_no_chunks() {
    let chunker = RecursiveChunker::new(100, 10).unwrap();
    assert!(chunker.chunk("").is_empty());
}

#[test]
fn short_text_is_a_single_whole_chunk() {
    let chunker = RecursiveChunker::new(100, 10).unwrap();
    let chunks = chunker.chunk("A short paragraph.");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "A short paragraph.");
    assert_eq!(chunks[0].index, 0);
}

#[test]
fn overlap_must_be_less_than_size() {
    assert!(matches!(RecursiveChunker::new(10, 10), Err(QaError::Config(_))));
    assert!(matches!(RecursiveChunker::new(10, 20), Err(QaError::Config(_))));
    assert!(matches!(RecursiveChunker::new(0, 0), Err(QaError::Config(_))));
    assert!(RecursiveChunker::new(10, 0).is_ok());
}

#[test]
fn splits_prefer_paragraph_boundaries() {
    let text = "First paragraph.\n\nSecond paragraph.\n\nThird paragraph.";
    let chunker = RecursiveChunker::new(20, 0).unwrap();
    let chunks = chunker.chunk(text);
    assert!(chunks.len() >= 3);
    assert!(chunks[0].text.ends_with("\n\n"));
    assert!(chunks.iter().all(|c| c.text.len() <= 20));
}

#[test]
fn chunk_indices_are_sequential() {
    let text = "word ".repeat(100);
    let chunker = RecursiveChunker::new(30, 5).unwrap();
    let chunks = chunker.chunk(&text);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.index, i);
    }
}

/// The scenario from the retrieval walk-through: a short first paragraph and
/// a long second one, split at 40 characters with a 10 character overlap.
#[test]
fn overlapping_chunks_for_two_paragraphs() {
    let text = "Paragraph one.\n\nParagraph two is longer and exceeds \
                the chunk size limit set for this test.";
    let chunker = RecursiveChunker::new(40, 10).unwrap();
    let chunks = chunker.chunk(text);

    assert!(chunks.len() >= 2);
    assert!(chunks.iter().all(|c| c.text.len() <= 40));

    // The first chunk carries no prefix, so its text is its content region.
    let first = &chunks[0].text;
    let carry = &first[first.len() - 10..];
    assert!(chunks[1].text.starts_with(carry));

    assert_eq!(reconstruct(&chunks, 10).unwrap(), text);
}

/// **Property: chunk coverage.** Concatenating chunks with the overlap
/// regions de-duplicated reconstructs the input exactly.
mod prop_chunk_coverage {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn chunks_reconstruct_the_input(
            text in "[a-z .\n]{0,300}",
            (size, overlap) in (2usize..60).prop_flat_map(|s| (Just(s), 0..s)),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text);
            let rebuilt = reconstruct(&chunks, overlap);
            prop_assert_eq!(rebuilt.as_deref(), Some(text.as_str()));
        }
    }
}

/// **Property: chunk size bound.** Every chunk is at most `size` long.
/// (ASCII input; the oversized-character escape hatch cannot trigger.)
mod prop_chunk_size_bound {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn no_chunk_exceeds_the_size(
            text in "[a-z .\n]{0,300}",
            (size, overlap) in (2usize..60).prop_flat_map(|s| (Just(s), 0..s)),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            for chunk in chunker.chunk(&text) {
                prop_assert!(
                    chunk.text.len() <= size,
                    "chunk {} has length {} > {}",
                    chunk.index,
                    chunk.text.len(),
                    size,
                );
            }
        }
    }
}

/// **Property: determinism.** The same input always yields the same chunks.
mod prop_chunk_determinism {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn chunking_twice_is_identical(
            text in "[a-z .\n]{0,300}",
            (size, overlap) in (2usize..60).prop_flat_map(|s| (Just(s), 0..s)),
        ) {
            let chunker = RecursiveChunker::new(size, overlap).unwrap();
            prop_assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
        }
    }
}
