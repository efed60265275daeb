//! Cross-document reconciliation.
//!
//! Compares the records of one surgery field by field and classifies each
//! disagreement. Any subset of the three records can be reconciled; values
//! from missing records are simply not compared.

pub mod comparators;
pub mod similarity;
pub mod slots;
pub mod summary;
pub mod synonyms;

pub use comparators::{Comparison, SupplyTally};
pub use slots::Slot;
pub use summary::summarize;
pub use synonyms::canonicalize;

use tracing::{debug, info};

use crate::models::config::ReconciliationConfig;
use crate::models::discrepancy::{DiscrepancyItem, NOT_AVAILABLE, ReconciliationReport};
use crate::models::record::RecordSet;

const NOT_APPLICABLE: &str = "Not applicable";
const EVALUATED: &str = "Evaluated";

/// Runs the seven field comparisons over a [`RecordSet`].
#[derive(Debug, Clone)]
pub struct Reconciler {
    similarity_threshold: f64,
    traceability_min_indicators: usize,
    procedure_preview_chars: usize,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self::from_config(&ReconciliationConfig::default())
    }

    pub fn from_config(config: &ReconciliationConfig) -> Self {
        Self {
            similarity_threshold: config.name_similarity_threshold,
            traceability_min_indicators: config.traceability_min_indicators,
            procedure_preview_chars: config.procedure_preview_chars,
        }
    }

    /// Minimum average similarity for text fields to match.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Indicators required for complete traceability.
    pub fn with_traceability_min_indicators(mut self, count: usize) -> Self {
        self.traceability_min_indicators = count;
        self
    }

    /// Reconcile the records. Always yields one item per [`Slot`], in order.
    pub fn reconcile(&self, records: &RecordSet) -> ReconciliationReport {
        let present: Vec<String> = records.present().iter().map(|t| t.to_string()).collect();
        info!("Reconciling records: {}", present.join(", "));

        let items: Vec<DiscrepancyItem> = Slot::ALL
            .iter()
            .map(|&slot| self.compare(slot, records))
            .collect();

        for item in items.iter().filter(|item| !item.matches) {
            debug!("{} [{}]: {}", item.field, item.severity, item.notes);
        }

        let summary = summarize(&items);
        info!(
            "{}/{} fields match ({}%), review: {:?}",
            summary.matching_fields,
            summary.total_fields_evaluated,
            summary.match_percentage,
            summary.review_priority
        );

        ReconciliationReport { items, summary }
    }

    fn compare(&self, slot: Slot, records: &RecordSet) -> DiscrepancyItem {
        match slot {
            Slot::ReportDate => {
                let values = slot.text_values(records);
                let result = comparators::compare_dates(&values);
                text_item(slot, values, result, |v| v.to_string())
            }
            Slot::Patient | Slot::ResponsiblePhysician | Slot::Location => {
                let values = slot.text_values(records);
                let result = comparators::compare_names(&values, self.similarity_threshold);
                text_item(slot, values, result, |v| v.to_string())
            }
            Slot::Procedure => {
                let values = slot.text_values(records);
                let result = comparators::compare_names(&values, self.similarity_threshold);
                text_item(slot, values, result, |v| preview(v, self.procedure_preview_chars))
            }
            Slot::Supplies => self.compare_supplies(records),
            Slot::Traceability => {
                let internal = records.internal.as_ref();
                let result = comparators::assess_traceability(
                    internal.map(|r| &r.traceability),
                    self.traceability_min_indicators,
                );
                let evaluated = if internal.is_some() { EVALUATED } else { NOT_AVAILABLE };
                item(slot, [evaluated, NOT_APPLICABLE, NOT_APPLICABLE].map(String::from), result)
            }
        }
    }

    fn compare_supplies(&self, records: &RecordSet) -> DiscrepancyItem {
        let internal = records.internal.as_ref();
        let hospital = records.hospital.as_ref();
        let description = records.description.as_ref();

        let tallies: [SupplyTally; 3] = [
            internal
                .map(|r| r.supplies.iter().filter_map(|s| Some((s.name.as_deref()?, s.quantity))).collect())
                .unwrap_or_default(),
            hospital
                .map(|r| r.supplies.iter().map(|s| (s.name.as_str(), s.quantity)).collect())
                .unwrap_or_default(),
            description
                .map(|r| r.supplies.iter().map(|s| (s.name.as_str(), None::<u32>)).collect())
                .unwrap_or_default(),
        ];
        let result = comparators::compare_supplies(&tallies);

        let counts = [
            internal.map(|r| r.supplies.len()),
            hospital.map(|r| r.supplies.len()),
            description.map(|r| r.supplies.len()),
        ];
        let values = counts.map(|count| match count {
            Some(n) => format!("{} supplies", n),
            None => NOT_AVAILABLE.to_string(),
        });

        item(Slot::Supplies, values, result)
    }
}

fn item(slot: Slot, values: [String; 3], result: Comparison) -> DiscrepancyItem {
    let [value_source_1, value_source_2, value_source_3] = values;
    DiscrepancyItem {
        field: slot.label().to_string(),
        value_source_1,
        value_source_2,
        value_source_3,
        matches: result.matches,
        notes: result.notes,
        severity: slot.severity(),
    }
}

fn text_item(
    slot: Slot,
    values: [Option<&str>; 3],
    result: Comparison,
    display: impl Fn(&str) -> String,
) -> DiscrepancyItem {
    let shown = values.map(|value| value.map(&display).unwrap_or_else(|| NOT_AVAILABLE.to_string()));
    item(slot, shown, result)
}

/// First `limit` characters of `value`, with "..." appended when cut.
fn preview(value: &str, limit: usize) -> String {
    if value.chars().count() > limit {
        let cut: String = value.chars().take(limit).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::discrepancy::{ReviewPriority, Severity};
    use crate::models::record::{HospitalReport, HospitalSupply, InternalReport, StructuredRecord};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_record_set_yields_seven_items() {
        let report = Reconciler::new().reconcile(&RecordSet::new());

        assert_eq!(report.items.len(), 7);
        assert!(report.items.iter().all(|item| !item.matches));
        assert!(report.items.iter().all(|item| item.value_source_1 == NOT_AVAILABLE));
        assert_eq!(report.summary.match_percentage, 0.0);
        assert_eq!(report.summary.review_priority, ReviewPriority::Urgent);

        let fields: Vec<&str> = report.items.iter().map(|item| item.field.as_str()).collect();
        let labels: Vec<&str> = Slot::ALL.iter().map(|slot| slot.label()).collect();
        assert_eq!(fields, labels);
    }

    #[test]
    fn test_procedure_value_is_shortened() {
        let long = "Procedimiento: Osteosíntesis encefálica con fijación de placa y tornillos";
        let records = RecordSet::new().with(StructuredRecord::Internal(InternalReport {
            procedure: Some(long.to_string()),
            ..Default::default()
        }));

        let report = Reconciler::new().reconcile(&records);
        let procedure = &report.items[2];

        assert_eq!(procedure.field, "Procedure data");
        assert_eq!(procedure.value_source_1.chars().count(), 53);
        assert!(procedure.value_source_1.ends_with("..."));
        assert!(procedure.matches);
        assert_eq!(procedure.severity, Severity::Medium);
    }

    #[test]
    fn test_supply_counts_and_traceability_labels() {
        let records = RecordSet {
            internal: Some(InternalReport::default()),
            hospital: Some(HospitalReport {
                supplies: vec![HospitalSupply {
                    name: "Tornillo encefálico".to_string(),
                    quantity: Some(2),
                    observations: None,
                }],
                ..Default::default()
            }),
            description: None,
        };

        let report = Reconciler::new().reconcile(&records);
        let supplies = &report.items[5];
        assert_eq!(supplies.value_source_1, "0 supplies");
        assert_eq!(supplies.value_source_2, "1 supplies");
        assert_eq!(supplies.value_source_3, NOT_AVAILABLE);
        assert!(supplies.matches);

        let traceability = &report.items[6];
        assert_eq!(traceability.value_source_1, "Evaluated");
        assert_eq!(traceability.value_source_2, "Not applicable");
        assert!(!traceability.matches);
    }

    #[test]
    fn test_similarity_threshold_is_configurable() {
        let records = RecordSet {
            internal: Some(InternalReport {
                location: Some("Bogota".to_string()),
                ..Default::default()
            }),
            hospital: Some(HospitalReport {
                location: Some("Bogotaa".to_string()),
                ..Default::default()
            }),
            description: None,
        };

        assert!(Reconciler::new().reconcile(&records).items[4].matches);
        assert!(
            !Reconciler::new()
                .with_similarity_threshold(0.99)
                .reconcile(&records)
                .items[4]
                .matches
        );
    }
}
