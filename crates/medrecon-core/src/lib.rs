//! Core library for surgical supply document reconciliation.
//!
//! This crate provides:
//! - Field extraction from three OCR'd document kinds (internal report,
//!   hospital report, surgical description)
//! - Cross-document reconciliation with severity classification
//! - Record, discrepancy and configuration models
//! - The OCR collaborator interface

pub mod error;
pub mod extraction;
pub mod models;
pub mod ocr;
pub mod reconcile;

pub use error::{MedreconError, OcrError, Result};
pub use extraction::{DescriptionExtractor, Extract, Extractors, HospitalExtractor, InternalExtractor};
pub use models::config::{ExtractionConfig, MedreconConfig, OcrConfig, ReconciliationConfig};
pub use models::discrepancy::{DiscrepancyItem, ReconciliationReport, ReviewPriority, Severity, Summary};
pub use models::record::{
    DocumentType, HospitalReport, InternalReport, RecordSet, StructuredRecord, SurgicalDescription,
};
pub use ocr::{OcrProvider, PlainTextProvider};
pub use reconcile::Reconciler;
