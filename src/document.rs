//! Data types for documents, chunks, search results, and answers.

use serde::{Deserialize, Serialize};

/// A source document: text extracted from one uploaded file.
///
/// Immutable once produced. Building an index over a new `Document`
/// replaces whatever was built from the previous one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The extracted text content.
    pub text: String,
    /// Where the text came from (file name or other caller-supplied label).
    pub source: String,
}

impl Document {
    /// Create a document from extracted text and a source label.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self { text: text.into(), source: source.into() }
    }
}

/// A contiguous substring of a [`Document`], the unit of retrieval.
///
/// Chunks carry no embedding; embeddings belong to the index entry a chunk
/// is stored under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub text: String,
    /// Position of this chunk in the document's chunk sequence (0, 1, 2, …).
    pub index: usize,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}

/// The completion output for one question, with the chunks it was given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The text produced by the completion service.
    pub text: String,
    /// The retrieval results supplied as context, similarity-descending.
    pub sources: Vec<SearchResult>,
}
