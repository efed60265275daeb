//! Free-text surgical description (document type 3).

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use super::rules::is_plausible_name;
use super::rules::patterns::*;
use super::text::normalize;
use super::{Extract, overflow_fields, prepare};
use crate::models::config::ExtractionConfig;
use crate::models::record::{
    ComplementaryData, DescriptionSupply, SurgicalDescription, TraceabilityMentions,
};

const KNOWN_LABELS: &[&str] = &[
    "fecha",
    "paciente",
    "nombre",
    "cc",
    "medico tratante",
    "cirujano",
    "especialidad",
    "tipo de anestesia",
    "centro",
    "institucion",
];

/// Narrative lines must be longer than this many characters.
const MIN_NARRATIVE_LINE: usize = 10;

/// Extractor for the surgeon's narrative description.
#[derive(Debug, Clone)]
pub struct DescriptionExtractor {
    apply_corrections: bool,
}

impl Default for DescriptionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptionExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            apply_corrections: config.apply_ocr_corrections,
        }
    }

    pub fn with_corrections(mut self, apply: bool) -> Self {
        self.apply_corrections = apply;
        self
    }

    fn procedure_narrative(&self, text: &str) -> Option<String> {
        let mut seen = HashSet::new();
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > MIN_NARRATIVE_LINE)
            .filter(|line| {
                let folded = normalize(line);
                NARRATIVE_KEYWORDS.iter().any(|k| folded.contains(k)) || NARRATIVE_MARKER.is_match(line)
            })
            .filter(|line| seen.insert(*line))
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    fn supplies(&self, text: &str) -> Vec<DescriptionSupply> {
        SUPPLY_MENTIONS
            .iter()
            .filter_map(|(pattern, canonical)| {
                let variants: BTreeSet<String> = pattern
                    .find_iter(text)
                    .map(|m| m.as_str().trim())
                    .filter(|v| v.chars().count() > 3)
                    .map(str::to_string)
                    .collect();

                if variants.is_empty() {
                    return None;
                }

                Some(DescriptionSupply {
                    name: canonical.to_string(),
                    variants,
                    traceability_mention: mentions_traceability(text, canonical),
                })
            })
            .collect()
    }

    fn traceability_mentions(&self, text: &str) -> TraceabilityMentions {
        let refs_found: Vec<String> = REF_CODE.captures_iter(text).map(|c| c[1].to_string()).collect();
        let lots_found: Vec<String> = LOT_CODE.captures_iter(text).map(|c| c[1].to_string()).collect();

        TraceabilityMentions {
            mentions_ref: !refs_found.is_empty(),
            refs_found,
            mentions_lot: !lots_found.is_empty(),
            lots_found,
            mentions_labels: LABEL_MENTION.is_match(text),
            mentions_traceability: TRACEABILITY_MENTION.is_match(text),
        }
    }

    fn complementary(&self, text: &str) -> ComplementaryData {
        let mut procedure_codes: Vec<String> = Vec::new();
        for m in PROCEDURE_CODE.find_iter(text) {
            if !procedure_codes.iter().any(|c| c == m.as_str()) {
                procedure_codes.push(m.as_str().to_string());
            }
        }

        ComplementaryData {
            date: DESCRIPTION_DATE.extract(text),
            patient: DESCRIPTION_PATIENT
                .first_accepted(text, |m| is_plausible_name(m.value))
                .map(|m| m.value.to_string()),
            attending_physician: ATTENDING_PHYSICIAN.extract(text),
            specialty: SPECIALTY.extract(text),
            procedure_codes,
            anesthesia_type: ANESTHESIA_TYPE.extract(text),
            medical_center: MEDICAL_CENTER.extract(text),
            other: overflow_fields(text, KNOWN_LABELS),
        }
    }
}

/// Whether any line naming `canonical` also carries a traceability keyword.
fn mentions_traceability(text: &str, canonical: &str) -> bool {
    let name = normalize(canonical);
    text.lines()
        .any(|line| normalize(line).contains(&name) && TRACEABILITY_KEYWORD.is_match(line))
}

impl Extract for DescriptionExtractor {
    type Record = SurgicalDescription;

    fn extract(&self, text: &str) -> SurgicalDescription {
        let text = prepare(text, self.apply_corrections);
        let text = text.as_ref();

        let supplies = self.supplies(text);
        debug!("Found {} supply mentions in narrative", supplies.len());

        SurgicalDescription {
            procedure_narrative: self.procedure_narrative(text),
            supplies,
            traceability_mentions: self.traceability_mentions(text),
            complementary: self.complementary(text),
        }
    }
}
