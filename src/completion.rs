//! Completion model trait for turning retrieved context into an answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Generation options passed through to the completion backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    /// Model identifier (e.g. `gpt-4o-mini`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Optional cap on generated tokens.
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { model: "gpt-4o-mini".to_string(), temperature: 0.3, max_output_tokens: None }
    }
}

/// Fixed instruction placed ahead of the retrieved context when building a
/// backend's system prompt.
pub const CONTEXT_INSTRUCTION: &str = "Answer the question using only the context provided \
     below. If the context does not contain the answer, say that you do not know.";

/// Assemble the system prompt sent to a completion backend: the fixed
/// instruction followed by the retrieved context block.
pub fn system_prompt(context: &str) -> String {
    format!("{CONTEXT_INSTRUCTION}\n\nContext:\n{context}")
}

/// A model that answers a question given a block of retrieved context.
///
/// Each call is independent: no conversation memory is kept between
/// invocations. Failure is reported as
/// [`QaError::Completion`](crate::error::QaError::Completion) with the
/// underlying cause.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate an answer to `query` using only `context`.
    async fn generate(
        &self,
        context: &str,
        query: &str,
        config: &GenerationConfig,
    ) -> Result<String>;
}
