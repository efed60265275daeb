//! Error types for the medrecon-core library.
//!
//! Extraction and reconciliation are total and never return these errors.
//! They only surface at the edges: document type tags, OCR providers,
//! configuration files and serialized record sets.

use thiserror::Error;

/// Main error type for the medrecon library.
#[derive(Error, Debug)]
pub enum MedreconError {
    /// Document type tag outside of 1..=3.
    #[error("invalid document type: {0} (expected 1, 2 or 3)")]
    InvalidDocumentType(String),

    /// OCR provider failure.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors reported by an OCR provider.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The source document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The provider could not read the document.
    #[error("failed to read document {path}: {reason}")]
    Read { path: String, reason: String },

    /// The provider returned no text at all.
    #[error("no text recognized in {0}")]
    Empty(String),
}

/// Result type for the medrecon library.
pub type Result<T> = std::result::Result<T, MedreconError>;
