//! Exact nearest-neighbor index over chunk embeddings.
//!
//! [`VectorIndex`] is built once per document and read-only afterwards.
//! [`IndexHandle`] owns the session's current index and replaces it only by
//! atomic swap, so readers see either the old complete index or the new one,
//! never a mix.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::document::{Chunk, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};

/// Chunks embedded per request during a build. Batches for one build are
/// issued concurrently.
const EMBED_BATCH_SIZE: usize = 64;

/// A chunk and the embedding the index owns for it.
#[derive(Debug, Clone)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// An in-memory nearest-neighbor index over chunk embeddings.
///
/// Search is an exact brute-force cosine scan over all stored vectors;
/// single-document chunk counts make anything fancier unnecessary.
#[derive(Debug, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Embed all chunks and construct a searchable index.
    ///
    /// Chunk texts are embedded in batches of up to 64, with the batches for
    /// one build issued concurrently. If any batch fails, the whole build
    /// fails and nothing is constructed.
    ///
    /// # Errors
    ///
    /// Propagates [`QaError::Embedding`] from the provider.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        if chunks.is_empty() {
            return Ok(Self::default());
        }

        let batches: Vec<Vec<&str>> = chunks
            .chunks(EMBED_BATCH_SIZE)
            .map(|batch| batch.iter().map(|c| c.text.as_str()).collect())
            .collect();

        debug!(chunk_count = chunks.len(), batch_count = batches.len(), "embedding chunks");

        let embedded =
            try_join_all(batches.iter().map(|batch| embedder.embed_batch(batch))).await.map_err(
                |e| {
                    error!(error = %e, "embedding failed during index build");
                    e
                },
            )?;
        let embeddings: Vec<Vec<f32>> = embedded.into_iter().flatten().collect();

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        Ok(Self { entries })
    }

    /// Number of chunks stored in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` chunks most similar to `query_embedding`.
    ///
    /// Results are ordered by descending cosine similarity; ties go to the
    /// lower chunk sequence index. `k` is clamped to the index size.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::IndexNotReady`] if the index is empty.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if self.entries.is_empty() {
            return Err(QaError::IndexNotReady);
        }

        let mut scored: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(&entry.embedding, query_embedding);
                SearchResult { chunk: entry.chunk.clone(), score }
            })
            .collect();

        // Stable sort: entries are in sequence order, so equal scores keep
        // the lower index first.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(self.entries.len()));
        Ok(scored)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Session-scoped holder of the current [`VectorIndex`].
///
/// At most one index exists at a time. [`rebuild`](IndexHandle::rebuild)
/// constructs the new index completely before swapping it in; a failed
/// rebuild leaves the previously published index (or none) in place.
/// Queries against a published index may run concurrently with each other.
#[derive(Debug, Default)]
pub struct IndexHandle {
    current: RwLock<Option<Arc<VectorIndex>>>,
}

impl IndexHandle {
    /// Create a handle with no index published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `chunks` and publish it, replacing any previous
    /// index. Returns the number of chunks indexed.
    ///
    /// # Errors
    ///
    /// Propagates [`QaError::Embedding`] from the build. On error the
    /// previously published index remains current.
    pub async fn rebuild(
        &self,
        chunks: Vec<Chunk>,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<usize> {
        // Build entirely off-lock so in-flight queries keep reading the old
        // index until the swap below.
        let index = VectorIndex::build(chunks, embedder).await?;
        let count = index.len();

        *self.current.write().await = Some(Arc::new(index));
        info!(chunk_count = count, "published index");
        Ok(count)
    }

    /// The currently published index, if any.
    pub async fn current(&self) -> Option<Arc<VectorIndex>> {
        self.current.read().await.clone()
    }

    /// Drop the published index, returning the handle to its initial state.
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// Search the currently published index.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::IndexNotReady`] if no index has been published or
    /// the published index is empty.
    pub async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        let index = self.current().await.ok_or(QaError::IndexNotReady)?;
        index.search(query_embedding, k)
    }
}
