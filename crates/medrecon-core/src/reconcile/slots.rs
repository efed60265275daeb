//! The seven reconciled fields and where each source keeps its value.

use crate::models::discrepancy::Severity;
use crate::models::record::RecordSet;

/// A reconciled field, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    ReportDate,
    Patient,
    Procedure,
    ResponsiblePhysician,
    Location,
    Supplies,
    Traceability,
}

impl Slot {
    pub const ALL: [Slot; 7] = [
        Self::ReportDate,
        Self::Patient,
        Self::Procedure,
        Self::ResponsiblePhysician,
        Self::Location,
        Self::Supplies,
        Self::Traceability,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::ReportDate => "Surgery/report date",
            Self::Patient => "Patient data",
            Self::Procedure => "Procedure data",
            Self::ResponsiblePhysician => "Responsible physician",
            Self::Location => "Location or city",
            Self::Supplies => "Supplies used",
            Self::Traceability => "Traceability (REF/LOT)",
        }
    }

    /// Severity of a mismatch in this field.
    pub fn severity(self) -> Severity {
        match self {
            Self::ReportDate | Self::Patient | Self::Supplies | Self::Traceability => Severity::High,
            Self::Procedure | Self::ResponsiblePhysician => Severity::Medium,
            Self::Location => Severity::Low,
        }
    }

    /// Text values of this field as (internal, hospital, description).
    ///
    /// The responsible physician slot joins three differently named fields:
    ///
    /// | source      | field                                  |
    /// |-------------|----------------------------------------|
    /// | internal    | `responsible_physician`                |
    /// | hospital    | `surgeon`                              |
    /// | description | `complementary.attending_physician`    |
    ///
    /// The description has no procedure or location of its own; its
    /// narrative and medical center are not comparable to those fields.
    /// Supplies and traceability are not text slots and yield no values.
    pub fn text_values(self, records: &RecordSet) -> [Option<&str>; 3] {
        let internal = records.internal.as_ref();
        let hospital = records.hospital.as_ref();
        let description = records.description.as_ref().map(|d| &d.complementary);

        match self {
            Self::ReportDate => [
                internal.and_then(|r| r.report_date.as_deref()),
                hospital.and_then(|r| r.report_date.as_deref()),
                description.and_then(|c| c.date.as_deref()),
            ],
            Self::Patient => [
                internal.and_then(|r| r.patient_name.as_deref()),
                hospital.and_then(|r| r.patient_name.as_deref()),
                description.and_then(|c| c.patient.as_deref()),
            ],
            Self::Procedure => [
                internal.and_then(|r| r.procedure.as_deref()),
                hospital.and_then(|r| r.procedure.as_deref()),
                None,
            ],
            Self::ResponsiblePhysician => [
                internal.and_then(|r| r.responsible_physician.as_deref()),
                hospital.and_then(|r| r.surgeon.as_deref()),
                description.and_then(|c| c.attending_physician.as_deref()),
            ],
            Self::Location => [
                internal.and_then(|r| r.location.as_deref()),
                hospital.and_then(|r| r.location.as_deref()),
                None,
            ],
            Self::Supplies | Self::Traceability => [None, None, None],
        }
    }
}
