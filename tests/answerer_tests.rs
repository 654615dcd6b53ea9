//! End-to-end tests for the retrieval-augmented answerer, with stub
//! embedding and completion backends.

use std::sync::Arc;

use async_trait::async_trait;
use pdfqa::chunking::RecursiveChunker;
use pdfqa::completion::{CompletionModel, GenerationConfig};
use pdfqa::config::QaConfig;
use pdfqa::document::Document;
use pdfqa::embedding::EmbeddingProvider;
use pdfqa::error::{QaError, Result};
use pdfqa::index::IndexHandle;
use pdfqa::Answerer;

/// Embeds any text containing the keyword along one axis and everything
/// else along the other, steering retrieval deterministically.
struct KeywordEmbedder {
    keyword: &'static str,
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.contains(self.keyword) {
            Ok(vec![0.0, 1.0])
        } else {
            Ok(vec![1.0, 0.0])
        }
    }

    fn dimensions(&self) -> usize {
        2
    }
}

/// Completion stub that echoes the context it received.
struct EchoCompletion;

#[async_trait]
impl CompletionModel for EchoCompletion {
    async fn generate(
        &self,
        context: &str,
        _query: &str,
        _config: &GenerationConfig,
    ) -> Result<String> {
        Ok(context.to_string())
    }
}

/// Completion stub that always fails.
struct FailingCompletion;

#[async_trait]
impl CompletionModel for FailingCompletion {
    async fn generate(
        &self,
        _context: &str,
        _query: &str,
        _config: &GenerationConfig,
    ) -> Result<String> {
        Err(QaError::Completion { provider: "stub".to_string(), message: "timeout".to_string() })
    }
}

fn answerer(embedder: Arc<dyn EmbeddingProvider>, completion: Arc<dyn CompletionModel>) -> Answerer {
    Answerer::builder()
        .config(QaConfig::builder().chunk_size(40).chunk_overlap(10).top_k(3).build().unwrap())
        .embedder(embedder)
        .completion(completion)
        .build()
        .unwrap()
}

/// The full build-then-query scenario: chunk two paragraphs at size 40 with
/// overlap 10, index them with a stub embedder, and check that a query
/// steered at the second chunk retrieves it first.
#[tokio::test]
async fn query_retrieves_the_steered_chunk_first() {
    let text = "Paragraph one.\n\nParagraph two is longer and exceeds \
                the chunk size limit set for this test.";
    let chunker = RecursiveChunker::new(40, 10).unwrap();

    let qa = answerer(Arc::new(KeywordEmbedder { keyword: "two" }), Arc::new(EchoCompletion));
    let handle = IndexHandle::new();

    let count =
        qa.index_document(&handle, &Document::new(text, "test.pdf"), &chunker).await.unwrap();
    assert!(count >= 2);

    let answer = qa.answer(&handle, "two").await.unwrap();
    // Only the second chunk contains the keyword.
    assert_eq!(answer.sources[0].chunk.index, 1);
    assert!(answer.sources[0].chunk.text.contains("two"));
    assert!(answer.sources[0].score > answer.sources[1].score);
}

/// With an echoing completion stub, the answer text is exactly the context
/// block, proving assembly order matches search result order.
#[tokio::test]
async fn answer_context_follows_result_order() {
    let text = "Paragraph one.\n\nParagraph two is longer and exceeds \
                the chunk size limit set for this test.";
    let chunker = RecursiveChunker::new(40, 10).unwrap();

    let qa = answerer(Arc::new(KeywordEmbedder { keyword: "two" }), Arc::new(EchoCompletion));
    let handle = IndexHandle::new();
    qa.index_document(&handle, &Document::new(text, "test.pdf"), &chunker).await.unwrap();

    let answer = qa.answer(&handle, "two").await.unwrap();

    // Every cited chunk appears in the echoed context, in result order.
    let mut last = 0;
    for source in &answer.sources {
        let pos = answer.text[last..]
            .find(&source.chunk.text)
            .expect("cited chunk missing from context");
        last += pos + source.chunk.text.len();
    }
}

#[tokio::test]
async fn answering_without_an_index_names_the_search_stage() {
    let qa = answerer(Arc::new(KeywordEmbedder { keyword: "x" }), Arc::new(EchoCompletion));
    let handle = IndexHandle::new();

    let err = qa.answer(&handle, "anything").await.unwrap_err();
    match err {
        QaError::Answer { stage, source } => {
            assert_eq!(stage, "search");
            assert!(matches!(*source, QaError::IndexNotReady));
        }
        other => panic!("expected Answer error, got {other}"),
    }
}

#[tokio::test]
async fn completion_failure_yields_no_partial_answer() {
    let text = "Paragraph one.\n\nParagraph two.";
    let chunker = RecursiveChunker::new(40, 10).unwrap();

    let qa = answerer(Arc::new(KeywordEmbedder { keyword: "two" }), Arc::new(FailingCompletion));
    let handle = IndexHandle::new();
    qa.index_document(&handle, &Document::new(text, "test.pdf"), &chunker).await.unwrap();

    let err = qa.answer(&handle, "two").await.unwrap_err();
    match err {
        QaError::Answer { stage, source } => {
            assert_eq!(stage, "completion");
            assert!(matches!(*source, QaError::Completion { .. }));
        }
        other => panic!("expected Answer error, got {other}"),
    }
}

#[test]
fn builder_requires_embedder_and_completion() {
    let err = Answerer::builder().build().unwrap_err();
    assert!(matches!(err, QaError::Config(_)));

    let err = Answerer::builder().completion(Arc::new(EchoCompletion)).build().unwrap_err();
    assert!(matches!(err, QaError::Config(_)));
}

#[test]
fn config_rejects_overlap_not_less_than_size() {
    let err = QaConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
    assert!(matches!(err, QaError::Config(_)));

    let err = QaConfig::builder().top_k(0).build().unwrap_err();
    assert!(matches!(err, QaError::Config(_)));
}
