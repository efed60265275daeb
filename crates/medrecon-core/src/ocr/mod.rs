//! OCR collaborator.
//!
//! Text acquisition sits outside extraction: a provider turns a document
//! into raw text and the extractors only ever see that text.

use std::path::Path;

use tracing::debug;

use crate::error::OcrError;

/// Source of raw document text.
pub trait OcrProvider: Send + Sync {
    /// Recognize the text of the document at `path`.
    fn extract_text(&self, path: &Path, language: &str) -> Result<String, OcrError>;
}

/// Provider for documents that were already run through OCR and saved as
/// UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextProvider;

impl PlainTextProvider {
    pub fn new() -> Self {
        Self
    }
}

impl OcrProvider for PlainTextProvider {
    fn extract_text(&self, path: &Path, language: &str) -> Result<String, OcrError> {
        if !path.exists() {
            return Err(OcrError::NotFound(path.display().to_string()));
        }

        debug!("Reading {} (language: {})", path.display(), language);

        let text = std::fs::read_to_string(path).map_err(|e| OcrError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        if text.trim().is_empty() {
            return Err(OcrError::Empty(path.display().to_string()));
        }

        Ok(text)
    }
}
