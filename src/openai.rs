//! OpenAI embedding and chat completion backends.
//!
//! This module is only available when the `openai` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::completion::{CompletionModel, GenerationConfig, system_prompt};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};

const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default model for OpenAI embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// Read the `OPENAI_API_KEY` environment variable or fail with a
/// configuration error.
fn api_key_from_env() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .map_err(|_| QaError::Config("OPENAI_API_KEY environment variable not set".to_string()))
}

/// Validate that a credential was actually supplied.
///
/// A missing key is a configuration error, surfaced before any call is
/// attempted.
fn require_api_key(api_key: String) -> Result<String> {
    if api_key.is_empty() {
        return Err(QaError::Config("OpenAI API key must not be empty".to_string()));
    }
    Ok(api_key)
}

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Batches are embedded in a single request to `/v1/embeddings`; the API
/// returns vectors in input order.
///
/// # Example
///
/// ```rust,ignore
/// use pdfqa::openai::OpenAiEmbeddings;
///
/// let embedder = OpenAiEmbeddings::new("sk-...")?;
/// let embedding = embedder.embed("hello world").await?;
/// ```
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddings {
    /// Create a new provider with the given API key.
    ///
    /// Uses the default model (`text-embedding-3-small`, 1536 dimensions).
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: require_api_key(api_key.into())?,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create a new provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env()?)
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the dimensionality reported for the configured model.
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Extract a readable message from an OpenAI error body.
async fn error_detail(response: reqwest::Response) -> (reqwest::StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail =
        serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
    (status, detail)
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| QaError::Embedding {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "OpenAI", batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(OPENAI_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "embedding request failed");
                QaError::Embedding {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(provider = "OpenAI", %status, "embeddings API error");
            return Err(QaError::Embedding {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            QaError::Embedding {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// A [`CompletionModel`] backed by the OpenAI chat completions API.
///
/// The retrieved context goes into the system message behind the fixed
/// answer-from-context instruction; the question goes into the user message.
///
/// # Example
///
/// ```rust,ignore
/// use pdfqa::openai::OpenAiChat;
///
/// let model = OpenAiChat::new("sk-...")?;
/// let text = model.generate(&context, "What does section 2 say?", &config).await?;
/// ```
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiChat {
    /// Create a new completion client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self { client: reqwest::Client::new(), api_key: require_api_key(api_key.into())? })
    }

    /// Create a new completion client using the `OPENAI_API_KEY`
    /// environment variable.
    pub fn from_env() -> Result<Self> {
        Self::new(api_key_from_env()?)
    }
}

#[async_trait]
impl CompletionModel for OpenAiChat {
    async fn generate(
        &self,
        context: &str,
        query: &str,
        config: &GenerationConfig,
    ) -> Result<String> {
        debug!(provider = "OpenAI", model = %config.model, "requesting completion");

        let request_body = ChatRequest {
            model: &config.model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt(context) },
                ChatMessage { role: "user", content: query.to_string() },
            ],
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "completion request failed");
                QaError::Completion {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let (status, detail) = error_detail(response).await;
            error!(provider = "OpenAI", %status, "chat API error");
            return Err(QaError::Completion {
                provider: "OpenAI".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            QaError::Completion {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response.choices.into_iter().next().and_then(|c| c.message.content).ok_or_else(|| {
            QaError::Completion {
                provider: "OpenAI".into(),
                message: "API returned no completion choices".into(),
            }
        })
    }
}
