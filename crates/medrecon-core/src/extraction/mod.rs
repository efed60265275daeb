//! Field extraction from OCR'd surgical documents.

mod description;
mod hospital;
mod internal;
pub mod rules;
pub mod text;

pub use description::DescriptionExtractor;
pub use hospital::HospitalExtractor;
pub use internal::InternalExtractor;

use std::borrow::Cow;
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::record::{DocumentType, StructuredRecord};
use rules::patterns::LABELED_LINE;

/// Extraction of one document kind into its structured record.
///
/// Extraction never fails: a field that cannot be found is left absent.
pub trait Extract {
    type Record;

    fn extract(&self, text: &str) -> Self::Record;
}

/// The three extractors, dispatched by document type.
#[derive(Debug, Clone, Default)]
pub struct Extractors {
    pub internal: InternalExtractor,
    pub hospital: HospitalExtractor,
    pub description: DescriptionExtractor,
}

impl Extractors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            internal: InternalExtractor::from_config(config),
            hospital: HospitalExtractor::from_config(config),
            description: DescriptionExtractor::from_config(config),
        }
    }

    /// Extract `text` as a document of type `doc_type`.
    pub fn extract(&self, doc_type: DocumentType, text: &str) -> StructuredRecord {
        info!("Extracting {} ({} chars)", doc_type, text.chars().count());

        let record = match doc_type {
            DocumentType::Internal => StructuredRecord::Internal(self.internal.extract(text)),
            DocumentType::Hospital => StructuredRecord::Hospital(self.hospital.extract(text)),
            DocumentType::Description => {
                StructuredRecord::Description(self.description.extract(text))
            }
        };

        let missing = record.missing_fields();
        if !missing.is_empty() {
            debug!("{}: fields not found: {}", doc_type.label(), missing.join(", "));
        }

        record
    }
}

/// Raw text with the OCR correction table applied when enabled.
fn prepare(text: &str, apply_corrections: bool) -> Cow<'_, str> {
    if apply_corrections {
        Cow::Owned(text::correct(text))
    } else {
        Cow::Borrowed(text)
    }
}

/// Collect `Label: value` lines whose normalized label is not in `known`.
///
/// The first value seen for a label is kept.
fn overflow_fields(text: &str, known: &[&str]) -> BTreeMap<String, String> {
    let mut other = BTreeMap::new();
    for caps in LABELED_LINE.captures_iter(text) {
        let key = text::normalize(&caps[1]);
        if key.is_empty() || known.iter().any(|k| key.starts_with(k)) {
            continue;
        }
        other
            .entry(key)
            .or_insert_with(|| caps[2].trim().to_string());
    }
    other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_document_type() {
        let extractors = Extractors::new();
        for doc_type in DocumentType::ALL {
            let record = extractors.extract(doc_type, "");
            assert_eq!(record.document_type(), doc_type);
        }
    }

    #[test]
    fn test_overflow_fields_skip_known_labels() {
        let text = "Paciente: Juan Perez\nHabitación: 302\nCama: B\nHabitacion: 999";
        let other = overflow_fields(text, &["paciente"]);

        assert_eq!(other.len(), 2);
        assert_eq!(other["habitacion"], "302");
        assert_eq!(other["cama"], "B");
    }

    #[test]
    fn test_prepare_respects_flag() {
        assert_eq!(prepare("Fecho: 1/1/2024", true), "Fecha: 1/1/2024");
        assert_eq!(prepare("Fecho: 1/1/2024", false), "Fecho: 1/1/2024");
    }
}
