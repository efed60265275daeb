//! Reconciliation output: per-field discrepancies and the run summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder shown for a source that has no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// How consequential a mismatch in a field is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(s)
    }
}

/// Outcome of one field comparison across the three sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscrepancyItem {
    /// Field label.
    pub field: String,
    /// Value from the internal report.
    pub value_source_1: String,
    /// Value from the hospital report.
    pub value_source_2: String,
    /// Value from the surgical description.
    pub value_source_3: String,
    pub matches: bool,
    pub notes: String,
    pub severity: Severity,
}

/// Review urgency derived from the non-matching HIGH severity items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPriority {
    Urgent,
    Necessary,
    Optional,
}

impl ReviewPriority {
    /// Priority for a number of non-matching HIGH severity items.
    pub fn from_high_mismatches(count: usize) -> Self {
        match count {
            0 => Self::Optional,
            1 | 2 => Self::Necessary,
            _ => Self::Urgent,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Urgent => "URGENT REVIEW: multiple critical discrepancies detected",
            Self::Necessary => "REVIEW NECESSARY: critical discrepancies in key fields",
            Self::Optional => "OPTIONAL REVIEW: only minor discrepancies detected",
        }
    }
}

/// Aggregate view of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_fields_evaluated: usize,
    pub matching_fields: usize,
    pub mismatched_fields: usize,
    /// Percentage of matching fields, rounded to two decimals.
    pub match_percentage: f64,
    /// Mismatch counts per severity; severities without mismatches are left out.
    pub mismatches_by_severity: BTreeMap<Severity, usize>,
    pub manual_review_required: bool,
    pub review_priority: ReviewPriority,
    pub recommendation: String,
}

/// Complete output of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub items: Vec<DiscrepancyItem>,
    pub summary: Summary,
}
