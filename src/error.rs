//! Error types for the `pdfqa` crate.

use thiserror::Error;

/// Errors that can occur while building an index or answering a question.
#[derive(Debug, Error)]
pub enum QaError {
    /// Invalid configuration: bad chunk parameters or a missing credential.
    ///
    /// Configuration errors are user-fixable; service errors may warrant
    /// retrying later. Callers can rely on the variant to tell them apart.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source document could not be read or parsed.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The embedding service failed (network, auth, or quota).
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The completion service failed (network, auth, or quota).
    #[error("Completion error ({provider}): {message}")]
    Completion {
        /// The completion backend that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A query was issued before any index was successfully built.
    #[error("Index not ready: no index has been built")]
    IndexNotReady,

    /// A stage of the answer pipeline failed. The originating error is
    /// preserved as the source.
    #[error("Answer failed during {stage}: {source}")]
    Answer {
        /// Which pipeline stage failed: `"embedding"`, `"search"`, or
        /// `"completion"`.
        stage: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<QaError>,
    },
}

impl QaError {
    /// Wrap an error as an answer-pipeline failure at the given stage.
    pub(crate) fn during(stage: &'static str, source: QaError) -> Self {
        QaError::Answer { stage, source: Box::new(source) }
    }
}

/// A convenience result type for QA operations.
pub type Result<T> = std::result::Result<T, QaError>;
