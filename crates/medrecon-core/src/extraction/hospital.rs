//! Hospital surgical expense report (document type 2).

use lazy_static::lazy_static;
use regex::Regex;

use super::rules::patterns::*;
use super::rules::supplies::scan_hospital_supplies;
use super::rules::{RuleMatch, is_plausible_name};
use super::text::{normalize, title_case};
use super::{Extract, overflow_fields, prepare};
use crate::models::config::ExtractionConfig;
use crate::models::record::{AdministrativeData, HospitalReport};

lazy_static! {
    static ref ENDS_WITH_POR: Regex = Regex::new(r"(?i)\bpor\s*$").unwrap();
}

/// Labels already mapped to named fields; everything else is overflow.
const KNOWN_LABELS: &[&str] = &[
    "paciente",
    "cliente",
    "fecha",
    "procedimiento",
    "cirujano",
    "especialista",
    "medico",
    "ciudad",
    "asegurador",
    "remision",
    "codigo",
];

/// Extractor for the hospital report.
#[derive(Debug, Clone)]
pub struct HospitalExtractor {
    apply_corrections: bool,
    quantity_ceiling: u32,
}

impl Default for HospitalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HospitalExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            apply_corrections: config.apply_ocr_corrections,
            quantity_ceiling: config.hospital_quantity_ceiling,
        }
    }

    pub fn with_corrections(mut self, apply: bool) -> Self {
        self.apply_corrections = apply;
        self
    }

    pub fn with_quantity_ceiling(mut self, ceiling: u32) -> Self {
        self.quantity_ceiling = ceiling;
        self
    }

    fn patient_name(&self, text: &str) -> Option<String> {
        PATIENT_NAME
            .first_accepted(text, |m| is_plausible_name(m.value))
            .map(|m| title_case(m.value))
    }

    /// The surgeon must not be the patient under another label.
    fn surgeon(&self, text: &str, patient: Option<&str>) -> Option<String> {
        let patient = patient.map(normalize);

        let accept = |m: &RuleMatch<'_>| {
            if !is_plausible_name(m.value) {
                return false;
            }
            if m.rule == "bare_dr" && ENDS_WITH_POR.is_match(&text[..m.start]) {
                return false;
            }
            match &patient {
                Some(patient) => {
                    let candidate = normalize(m.value);
                    !(candidate.contains(patient.as_str()) || patient.contains(candidate.as_str()))
                }
                None => true,
            }
        };

        SURGEON.first_accepted(text, accept).map(|m| m.value.to_string())
    }

    fn administrative(&self, text: &str) -> AdministrativeData {
        AdministrativeData {
            insurer: INSURER.extract(text),
            referral_number: REFERRAL_NUMBER.extract(text),
            report_code: REPORT_CODE.extract(text),
            other: overflow_fields(text, KNOWN_LABELS),
        }
    }
}

impl Extract for HospitalExtractor {
    type Record = HospitalReport;

    fn extract(&self, text: &str) -> HospitalReport {
        let text = prepare(text, self.apply_corrections);
        let text = text.as_ref();

        let patient_name = self.patient_name(text);
        let surgeon = self.surgeon(text, patient_name.as_deref());

        HospitalReport {
            patient_name,
            report_date: REPORT_DATE.extract(text),
            procedure: PROCEDURE.extract(text),
            surgeon,
            supplies: scan_hospital_supplies(text, self.quantity_ceiling),
            location: LOCATION.extract(text),
            administrative: self.administrative(text),
        }
    }
}
