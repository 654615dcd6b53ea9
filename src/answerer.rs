//! Retrieval-augmented answering.
//!
//! The [`Answerer`] coordinates one question: embed the query, retrieve the
//! top-k chunks from the session's index, assemble them into a context
//! block, and delegate to the completion model. Construct one via
//! [`Answerer::builder()`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfqa::{Answerer, IndexHandle, QaConfig, RecursiveChunker};
//!
//! let answerer = Answerer::builder()
//!     .embedder(Arc::new(embedder))
//!     .completion(Arc::new(model))
//!     .build()?;
//!
//! let handle = IndexHandle::new();
//! answerer.index_document(&handle, &document, &chunker).await?;
//! let answer = answerer.answer(&handle, "What is this document about?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::chunking::Chunker;
use crate::completion::{CompletionModel, GenerationConfig};
use crate::config::QaConfig;
use crate::document::{Answer, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::index::IndexHandle;

/// Separator placed between retrieved chunks in the assembled context block.
const CHUNK_DELIMITER: &str = "\n\n---\n\n";

/// Orchestrates retrieval-augmented question answering.
///
/// Stateless per invocation: prior queries and answers do not influence
/// later ones.
pub struct Answerer {
    config: QaConfig,
    generation: GenerationConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    completion: Arc<dyn CompletionModel>,
}

impl std::fmt::Debug for Answerer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Answerer")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .field("embedder", &"<dyn EmbeddingProvider>")
            .field("completion", &"<dyn CompletionModel>")
            .finish()
    }
}

impl Answerer {
    /// Create a new [`AnswererBuilder`].
    pub fn builder() -> AnswererBuilder {
        AnswererBuilder::default()
    }

    /// Return a reference to the retrieval configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Return a reference to the generation configuration.
    pub fn generation(&self) -> &GenerationConfig {
        &self.generation
    }

    /// Chunk a document and publish a fresh index for it on `handle`.
    ///
    /// Returns the number of chunks indexed. On failure the handle keeps
    /// whatever index it had before.
    ///
    /// # Errors
    ///
    /// Propagates [`QaError::Embedding`] from the build.
    pub async fn index_document(
        &self,
        handle: &IndexHandle,
        document: &Document,
        chunker: &dyn Chunker,
    ) -> Result<usize> {
        let chunks = chunker.chunk(&document.text);
        info!(source = %document.source, chunk_count = chunks.len(), "chunked document");
        handle.rebuild(chunks, self.embedder.as_ref()).await
    }

    /// Answer a question from the currently indexed document.
    ///
    /// Embeds the query, retrieves the configured top-k chunks, concatenates
    /// them similarity-descending into a delimited context block, and asks
    /// the completion model. The returned [`Answer`] carries the retrieval
    /// results that were supplied as context.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Answer`] naming the failed stage, with the
    /// originating error as its source. No partial answer is returned.
    pub async fn answer(&self, handle: &IndexHandle, query: &str) -> Result<Answer> {
        let query_embedding = self.embedder.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            QaError::during("embedding", e)
        })?;

        let sources = handle
            .search(&query_embedding, self.config.top_k)
            .await
            .map_err(|e| QaError::during("search", e))?;

        let context = assemble_context(&sources);

        let text =
            self.completion.generate(&context, query, &self.generation).await.map_err(|e| {
                error!(error = %e, "completion failed");
                QaError::during("completion", e)
            })?;

        info!(source_count = sources.len(), "answer generated");
        Ok(Answer { text, sources })
    }
}

/// Concatenate retrieved chunk texts in result order, delimited.
fn assemble_context(results: &[SearchResult]) -> String {
    results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join(CHUNK_DELIMITER)
}

/// Builder for constructing an [`Answerer`].
///
/// The embedding provider and completion model are required; configuration
/// falls back to defaults when unset.
#[derive(Default)]
pub struct AnswererBuilder {
    config: Option<QaConfig>,
    generation: Option<GenerationConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    completion: Option<Arc<dyn CompletionModel>>,
}

impl AnswererBuilder {
    /// Set the retrieval configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the generation configuration.
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the completion model.
    pub fn completion(mut self, completion: Arc<dyn CompletionModel>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Build the [`Answerer`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if the embedder or completion model is
    /// missing.
    pub fn build(self) -> Result<Answerer> {
        let embedder =
            self.embedder.ok_or_else(|| QaError::Config("embedder is required".to_string()))?;
        let completion =
            self.completion.ok_or_else(|| QaError::Config("completion is required".to_string()))?;

        Ok(Answerer {
            config: self.config.unwrap_or_default(),
            generation: self.generation.unwrap_or_default(),
            embedder,
            completion,
        })
    }
}
