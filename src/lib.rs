//! # pdfqa
//!
//! Retrieval-augmented question answering over extracted PDF text.
//!
//! ## Overview
//!
//! This crate implements the retrieval pipeline behind a single-document QA
//! session: deterministic text chunking, an exact in-memory vector index,
//! and the orchestration that turns a question into an answer with cited
//! chunks. External capabilities — text extraction, embeddings, chat
//! completion — sit behind traits; `reqwest`-backed OpenAI implementations
//! are available under the `openai` feature.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfqa::openai::{OpenAiChat, OpenAiEmbeddings};
//! use pdfqa::{Answerer, Document, IndexHandle, QaConfig, RecursiveChunker};
//!
//! let config = QaConfig::builder().chunk_size(1000).chunk_overlap(100).top_k(3).build()?;
//! let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?;
//!
//! let answerer = Answerer::builder()
//!     .config(config)
//!     .embedder(Arc::new(OpenAiEmbeddings::from_env()?))
//!     .completion(Arc::new(OpenAiChat::from_env()?))
//!     .build()?;
//!
//! let document = Document::new(extracted_text, "report.pdf");
//! let handle = IndexHandle::new();
//! let chunk_count = answerer.index_document(&handle, &document, &chunker).await?;
//!
//! let answer = answerer.answer(&handle, "What are the key findings?").await?;
//! println!("{}", answer.text);
//! for source in &answer.sources {
//!     println!("[chunk {} · {:.3}]", source.chunk.index, source.score);
//! }
//! ```
//!
//! ## Design
//!
//! - One session, one document, one index: [`IndexHandle`] holds at most one
//!   [`VectorIndex`] and replaces it only by atomic swap. Readers see the
//!   old complete index or the new one, never a mix.
//! - Search is an exact brute-force cosine scan, ordered descending with
//!   ties going to the lower chunk index.
//! - Failures are typed ([`QaError`]) and never swallowed; the core performs
//!   no retries — that policy belongs to the caller.

pub mod answerer;
pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod index;
#[cfg(feature = "openai")]
pub mod openai;

pub use answerer::{Answerer, AnswererBuilder};
pub use chunking::{Chunker, RecursiveChunker};
pub use completion::{CompletionModel, GenerationConfig};
pub use config::{QaConfig, QaConfigBuilder};
pub use document::{Answer, Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{QaError, Result};
pub use extract::TextExtractor;
pub use index::{IndexHandle, VectorIndex};
