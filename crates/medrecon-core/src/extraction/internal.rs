//! Internal surgical expense report (document type 1).

use tracing::debug;

use super::rules::is_plausible_name;
use super::rules::patterns::*;
use super::rules::supplies::scan_internal_supplies;
use super::{Extract, prepare};
use crate::models::config::ExtractionConfig;
use crate::models::record::{InternalReport, TraceabilityFlags};

/// Extractor for the internal report, which carries full REF/LOT traceability.
#[derive(Debug, Clone)]
pub struct InternalExtractor {
    apply_corrections: bool,
    quantity_ceiling: u32,
    label_window: usize,
}

impl Default for InternalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InternalExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            apply_corrections: config.apply_ocr_corrections,
            quantity_ceiling: config.internal_quantity_ceiling,
            label_window: config.label_search_window,
        }
    }

    /// Enable or disable the OCR correction pass.
    pub fn with_corrections(mut self, apply: bool) -> Self {
        self.apply_corrections = apply;
        self
    }

    /// Leading numbers at or above the ceiling are not quantities.
    pub fn with_quantity_ceiling(mut self, ceiling: u32) -> Self {
        self.quantity_ceiling = ceiling;
        self
    }

    /// Lines searched on each side of a supply line for its lot and expiry.
    pub fn with_label_window(mut self, window: usize) -> Self {
        self.label_window = window;
        self
    }

    fn traceability(&self, text: &str) -> TraceabilityFlags {
        TraceabilityFlags {
            has_references: REF_CODE.is_match(text),
            has_lots: LOT_CODE.is_match(text),
            has_udi: UDI_CODE.is_match(text),
            has_expiry_dates: ISO_DATE.is_match(text),
        }
    }
}

impl Extract for InternalExtractor {
    type Record = InternalReport;

    fn extract(&self, text: &str) -> InternalReport {
        let text = prepare(text, self.apply_corrections);
        let text = text.as_ref();

        let supplies = scan_internal_supplies(text, self.quantity_ceiling, self.label_window);
        debug!("Found {} referenced supply lines", supplies.len());

        InternalReport {
            patient_name: PATIENT_NAME
                .first_accepted(text, |m| is_plausible_name(m.value))
                .map(|m| m.value.to_string()),
            report_date: REPORT_DATE.extract(text),
            procedure: PROCEDURE.extract(text),
            responsible_physician: RESPONSIBLE_PHYSICIAN.extract(text),
            supplies,
            traceability: self.traceability(text),
            location: LOCATION.extract(text),
            signatures: SIGNATURES.extract(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "\
REPORTE DE GASTO QUIRURGICO
Fecha: 10/05/2024
Cliente: Juan Perez
Procedimiento: Osteosíntesis encefálica
Especialista: Dr. Carlos Ruiz
Ciudad: Bucaramanga
2 Tornillo encefálico 2.0x6mm REF 102030
LOT: 778899
Vence 2027-03-31
Firma: Ana Gomez";

    #[test]
    fn test_extract_full_report() {
        let report = InternalExtractor::new().extract(REPORT);

        assert_eq!(report.patient_name.as_deref(), Some("Juan Perez"));
        assert_eq!(report.report_date.as_deref(), Some("10/05/2024"));
        assert_eq!(
            report.procedure.as_deref(),
            Some("Procedimiento: Osteosíntesis encefálica")
        );
        assert_eq!(report.responsible_physician.as_deref(), Some("Dr. Carlos Ruiz"));
        assert_eq!(report.location.as_deref(), Some("Bucaramanga"));
        assert_eq!(report.signatures.as_deref(), Some("Ana Gomez"));

        assert_eq!(report.supplies.len(), 1);
        let supply = &report.supplies[0];
        assert_eq!(supply.reference, "102030");
        assert_eq!(supply.quantity, Some(2));
        assert_eq!(supply.lot.as_deref(), Some("778899"));
        assert!(supply.label_present);

        assert_eq!(
            report.traceability,
            TraceabilityFlags {
                has_references: true,
                has_lots: true,
                has_udi: false,
                has_expiry_dates: true,
            }
        );
    }

    #[test]
    fn test_ocr_corrections_applied() {
        let text = "Fecho: 01/02/2024\nProcedmeo: Reducción abierta\nEspecialeta: Dr. Luis Mora\n";
        let report = InternalExtractor::new().extract(text);
        assert_eq!(report.report_date.as_deref(), Some("01/02/2024"));
        assert_eq!(report.procedure.as_deref(), Some("Procedimiento: Reducción abierta"));
        assert_eq!(report.responsible_physician.as_deref(), Some("Dr. Luis Mora"));

        let raw = InternalExtractor::new().with_corrections(false).extract(text);
        assert_eq!(raw.procedure.as_deref(), Some("Procedmeo: Reducción abierta"));
    }

    #[test]
    fn test_short_patient_candidate_falls_through() {
        let text = "Atendido por Eva\nPaciente: Maria Lopez\n";
        let report = InternalExtractor::new().extract(text);
        assert_eq!(report.patient_name.as_deref(), Some("Maria Lopez"));
    }

    #[test]
    fn test_empty_text_yields_empty_record() {
        let report = InternalExtractor::new().extract("");
        assert_eq!(report, InternalReport::default());
    }
}
