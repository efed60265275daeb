//! Structured records produced by the three document extractors.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MedreconError;

/// Kind of source document.
///
/// The numeric tags (1, 2, 3) are the ones operators use on the command
/// line and in combined record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Internal surgical expense report with full traceability (REF/LOT).
    Internal,
    /// Hospital surgical expense report, usually without traceability.
    Hospital,
    /// Free-text surgical description written by the surgeon.
    Description,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::Internal, Self::Hospital, Self::Description];

    /// Numeric tag of this document type.
    pub fn tag(self) -> u8 {
        match self {
            Self::Internal => 1,
            Self::Hospital => 2,
            Self::Description => 3,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Internal => "Internal report",
            Self::Hospital => "Hospital report",
            Self::Description => "Surgical description",
        }
    }
}

impl TryFrom<u8> for DocumentType {
    type Error = MedreconError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Internal),
            2 => Ok(Self::Hospital),
            3 => Ok(Self::Description),
            other => Err(MedreconError::InvalidDocumentType(other.to_string())),
        }
    }
}

impl FromStr for DocumentType {
    type Err = MedreconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "internal" | "interno" => Ok(Self::Internal),
            "2" | "hospital" => Ok(Self::Hospital),
            "3" | "description" | "descripcion" => Ok(Self::Description),
            _ => Err(MedreconError::InvalidDocumentType(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.tag())
    }
}

/// A structured record extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", rename_all = "snake_case")]
pub enum StructuredRecord {
    Internal(InternalReport),
    Hospital(HospitalReport),
    Description(SurgicalDescription),
}

impl StructuredRecord {
    /// Document type this record was extracted from.
    pub fn document_type(&self) -> DocumentType {
        match self {
            Self::Internal(_) => DocumentType::Internal,
            Self::Hospital(_) => DocumentType::Hospital,
            Self::Description(_) => DocumentType::Description,
        }
    }

    /// Names of fields that could not be extracted.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self {
            Self::Internal(r) => r.missing_fields(),
            Self::Hospital(r) => r.missing_fields(),
            Self::Description(r) => r.missing_fields(),
        }
    }
}

/// Internal surgical expense report (document type 1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_physician: Option<String>,

    pub supplies: Vec<InternalSupply>,

    /// Document-wide traceability indicators.
    pub traceability: TraceabilityFlags,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signatures: Option<String>,
}

impl InternalReport {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        push_missing(&mut missing, "patient_name", &self.patient_name);
        push_missing(&mut missing, "report_date", &self.report_date);
        push_missing(&mut missing, "procedure", &self.procedure);
        push_missing(&mut missing, "responsible_physician", &self.responsible_physician);
        push_missing(&mut missing, "location", &self.location);
        push_missing(&mut missing, "signatures", &self.signatures);
        if self.supplies.is_empty() {
            missing.push("supplies");
        }
        missing
    }
}

/// A supply line from the internal report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalSupply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    /// Manufacturer reference code (REF). Always present for emitted lines.
    pub reference: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// True when a lot code or expiry date was found near the line.
    pub label_present: bool,
}

/// The four regulatory traceability indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceabilityFlags {
    pub has_references: bool,
    pub has_lots: bool,
    pub has_udi: bool,
    pub has_expiry_dates: bool,
}

impl TraceabilityFlags {
    /// Indicators as (name, present) pairs, in reporting order.
    pub fn indicators(&self) -> [(&'static str, bool); 4] {
        [
            ("references", self.has_references),
            ("lots", self.has_lots),
            ("udi", self.has_udi),
            ("expiry dates", self.has_expiry_dates),
        ]
    }

    pub fn present_count(&self) -> usize {
        self.indicators().iter().filter(|(_, present)| *present).count()
    }
}

/// Hospital surgical expense report (document type 2).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub surgeon: Option<String>,

    pub supplies: Vec<HospitalSupply>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    pub administrative: AdministrativeData,
}

impl HospitalReport {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        push_missing(&mut missing, "patient_name", &self.patient_name);
        push_missing(&mut missing, "report_date", &self.report_date);
        push_missing(&mut missing, "procedure", &self.procedure);
        push_missing(&mut missing, "surgeon", &self.surgeon);
        push_missing(&mut missing, "location", &self.location);
        if self.supplies.is_empty() {
            missing.push("supplies");
        }
        missing
    }
}

/// A supply line from the hospital report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HospitalSupply {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// Administrative block of the hospital report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdministrativeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_code: Option<String>,

    /// Other labeled values found in the document.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

/// Free-text surgical description (document type 3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurgicalDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_narrative: Option<String>,

    pub supplies: Vec<DescriptionSupply>,

    pub traceability_mentions: TraceabilityMentions,

    pub complementary: ComplementaryData,
}

impl SurgicalDescription {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        push_missing(&mut missing, "procedure_narrative", &self.procedure_narrative);
        push_missing(&mut missing, "complementary.date", &self.complementary.date);
        push_missing(&mut missing, "complementary.patient", &self.complementary.patient);
        push_missing(
            &mut missing,
            "complementary.attending_physician",
            &self.complementary.attending_physician,
        );
        if self.supplies.is_empty() {
            missing.push("supplies");
        }
        missing
    }
}

/// A supply mentioned in the surgical narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionSupply {
    /// Canonical name of the mention.
    pub name: String,

    /// Raw spellings found in the text.
    pub variants: BTreeSet<String>,

    /// True when a line naming the supply also mentions REF, LOT, labels or traceability.
    pub traceability_mention: bool,
}

/// Traceability references found in the surgical narrative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceabilityMentions {
    pub mentions_ref: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refs_found: Vec<String>,

    pub mentions_lot: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lots_found: Vec<String>,

    pub mentions_labels: bool,

    pub mentions_traceability: bool,
}

/// Complementary data of the surgical description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplementaryData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attending_physician: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub procedure_codes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anesthesia_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_center: Option<String>,

    /// Other labeled values found in the document.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

/// The (up to three) records taking part in one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<InternalReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital: Option<HospitalReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<SurgicalDescription>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a record into its slot, replacing any record of the same type.
    pub fn insert(&mut self, record: StructuredRecord) {
        match record {
            StructuredRecord::Internal(r) => self.internal = Some(r),
            StructuredRecord::Hospital(r) => self.hospital = Some(r),
            StructuredRecord::Description(r) => self.description = Some(r),
        }
    }

    pub fn with(mut self, record: StructuredRecord) -> Self {
        self.insert(record);
        self
    }

    /// Document types present in this set.
    pub fn present(&self) -> Vec<DocumentType> {
        let mut present = Vec::new();
        if self.internal.is_some() {
            present.push(DocumentType::Internal);
        }
        if self.hospital.is_some() {
            present.push(DocumentType::Hospital);
        }
        if self.description.is_some() {
            present.push(DocumentType::Description);
        }
        present
    }

    pub fn is_empty(&self) -> bool {
        self.internal.is_none() && self.hospital.is_none() && self.description.is_none()
    }

    /// Load a combined record file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl FromIterator<StructuredRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = StructuredRecord>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

fn push_missing(missing: &mut Vec<&'static str>, name: &'static str, value: &Option<String>) {
    if value.is_none() {
        missing.push(name);
    }
}
