//! Text extraction seam for uploaded documents.

use crate::document::Document;
use crate::error::Result;

/// Extracts plain text from an uploaded file's bytes.
///
/// The core treats the output as an opaque [`Document`]; what format the
/// bytes are in (PDF or otherwise) is the implementation's business.
/// Corrupt or unreadable input fails with
/// [`QaError::Extraction`](crate::error::QaError::Extraction).
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of `bytes`.
    fn extract(&self, bytes: &[u8]) -> Result<String>;

    /// Extract and wrap the result as a [`Document`] with a source label.
    fn extract_document(&self, bytes: &[u8], source: &str) -> Result<Document> {
        Ok(Document::new(self.extract(bytes)?, source))
    }
}
