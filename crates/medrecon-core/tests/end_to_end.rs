use medrecon_core::{
    DocumentType, Extractors, RecordSet, Reconciler, ReviewPriority, Severity, StructuredRecord,
};
use pretty_assertions::assert_eq;

const INTERNAL: &str = include_str!("fixtures/internal.txt");
const HOSPITAL: &str = include_str!("fixtures/hospital.txt");
const DESCRIPTION: &str = include_str!("fixtures/description.txt");

fn extract_all(internal: &str, hospital: &str, description: &str) -> RecordSet {
    let extractors = Extractors::new();
    [
        (DocumentType::Internal, internal),
        (DocumentType::Hospital, hospital),
        (DocumentType::Description, description),
    ]
    .into_iter()
    .map(|(doc_type, text)| extractors.extract(doc_type, text))
    .collect()
}

#[test]
fn agreeing_documents_fully_match() {
    let records = extract_all(INTERNAL, HOSPITAL, DESCRIPTION);
    let report = Reconciler::new().reconcile(&records);

    for item in &report.items {
        assert!(item.matches, "{} did not match: {}", item.field, item.notes);
    }
    assert_eq!(report.summary.total_fields_evaluated, 7);
    assert_eq!(report.summary.matching_fields, 7);
    assert_eq!(report.summary.match_percentage, 100.0);
    assert!(!report.summary.manual_review_required);
    assert!(report.summary.mismatches_by_severity.is_empty());
    assert_eq!(report.summary.review_priority, ReviewPriority::Optional);
}

#[test]
fn extracted_records_carry_expected_fields() {
    let records = extract_all(INTERNAL, HOSPITAL, DESCRIPTION);

    let internal = records.internal.unwrap();
    assert_eq!(internal.supplies.len(), 2);
    assert_eq!(internal.supplies[1].name.as_deref(), Some("Placa CurvaNerv"));
    assert_eq!(internal.supplies[1].reference, "405060-01");
    assert_eq!(internal.traceability.present_count(), 4);

    let hospital = records.hospital.unwrap();
    assert_eq!(hospital.patient_name.as_deref(), Some("Juan Perez"));
    assert_eq!(hospital.administrative.insurer.as_deref(), Some("Nueva EPS"));

    let description = records.description.unwrap();
    assert_eq!(description.complementary.procedure_codes, vec!["T020".to_string()]);
    assert!(description.traceability_mentions.mentions_labels);
}

#[test]
fn conflicting_documents_need_urgent_review() {
    let hospital = HOSPITAL
        .replace("10/05/2024", "11/05/2024")
        .replace("JUAN PEREZ", "MARIA LOPEZ")
        .replace("2 Tornillo", "3 Tornillo");
    let records = extract_all(INTERNAL, &hospital, DESCRIPTION);
    let report = Reconciler::new().reconcile(&records);

    let failed: Vec<&str> = report
        .items
        .iter()
        .filter(|item| !item.matches)
        .map(|item| item.field.as_str())
        .collect();
    assert_eq!(failed, vec!["Surgery/report date", "Patient data", "Supplies used"]);

    assert_eq!(report.summary.mismatches_by_severity.get(&Severity::High), Some(&3));
    assert_eq!(report.summary.review_priority, ReviewPriority::Urgent);
    assert!(report.summary.manual_review_required);
    assert!(report.summary.recommendation.to_lowercase().contains("urgent"));
    assert!(report.items[5].notes.contains("S1:2, S2:3"));
}

#[test]
fn partial_record_sets_are_reconciled() {
    let extractors = Extractors::new();
    let records = RecordSet::new().with(extractors.extract(DocumentType::Hospital, HOSPITAL));
    let report = Reconciler::new().reconcile(&records);

    assert_eq!(report.items.len(), 7);
    // Every text field has a single value, which trivially matches
    assert!(report.items[..5].iter().all(|item| item.matches));
    assert!(!report.items[6].matches);
    assert_eq!(report.items[6].value_source_1, "N/A");
}

#[test]
fn extraction_is_deterministic() {
    let extractors = Extractors::new();
    for (doc_type, text) in [
        (DocumentType::Internal, INTERNAL),
        (DocumentType::Hospital, HOSPITAL),
        (DocumentType::Description, DESCRIPTION),
    ] {
        let first = serde_json::to_string(&extractors.extract(doc_type, text)).unwrap();
        let second = serde_json::to_string(&extractors.extract(doc_type, text)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn record_set_loads_from_combined_file() {
    let records = extract_all(INTERNAL, HOSPITAL, DESCRIPTION);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();

    let loaded = RecordSet::from_file(&path).unwrap();
    assert_eq!(loaded.present(), DocumentType::ALL.to_vec());
    assert_eq!(
        Reconciler::new().reconcile(&loaded),
        Reconciler::new().reconcile(&records)
    );
}

#[test]
fn records_serialize_with_document_type_tag() {
    let record = Extractors::new().extract(DocumentType::Hospital, HOSPITAL);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["document_type"], "hospital");
    assert_eq!(json["surgeon"], "Dr. Carlos Ruiz");

    let back: StructuredRecord = serde_json::from_value(json).unwrap();
    assert_eq!(back, record);
}
