//! Aggregation of discrepancy items into a run summary.

use std::collections::BTreeMap;

use crate::models::discrepancy::{DiscrepancyItem, ReviewPriority, Severity, Summary};

/// Summarize a list of discrepancy items.
pub fn summarize(items: &[DiscrepancyItem]) -> Summary {
    let total = items.len();
    let matching = items.iter().filter(|item| item.matches).count();

    let mut mismatches_by_severity = BTreeMap::new();
    for item in items.iter().filter(|item| !item.matches) {
        *mismatches_by_severity.entry(item.severity).or_insert(0) += 1;
    }

    let high_mismatches = mismatches_by_severity.get(&Severity::High).copied().unwrap_or(0);
    let review_priority = ReviewPriority::from_high_mismatches(high_mismatches);

    Summary {
        total_fields_evaluated: total,
        matching_fields: matching,
        mismatched_fields: total - matching,
        match_percentage: percentage(matching, total),
        mismatches_by_severity,
        manual_review_required: high_mismatches > 0,
        review_priority,
        recommendation: review_priority.recommendation().to_string(),
    }
}

/// `part / total` as a percentage rounded to two decimals.
fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(severity: Severity, matches: bool) -> DiscrepancyItem {
        DiscrepancyItem {
            field: "field".to_string(),
            value_source_1: "a".to_string(),
            value_source_2: "b".to_string(),
            value_source_3: "c".to_string(),
            matches,
            notes: String::new(),
            severity,
        }
    }

    #[test]
    fn test_three_high_mismatches_are_urgent() {
        let items = vec![
            item(Severity::High, false),
            item(Severity::High, false),
            item(Severity::High, false),
            item(Severity::Medium, false),
            item(Severity::Low, true),
            item(Severity::High, true),
            item(Severity::Medium, true),
        ];
        let summary = summarize(&items);

        assert_eq!(summary.total_fields_evaluated, 7);
        assert_eq!(summary.matching_fields, 3);
        assert_eq!(summary.mismatched_fields, 4);
        assert_eq!(summary.match_percentage, 42.86);
        assert_eq!(summary.review_priority, ReviewPriority::Urgent);
        assert!(summary.recommendation.to_lowercase().contains("urgent"));
        assert!(summary.manual_review_required);
        assert_eq!(
            summary.mismatches_by_severity,
            BTreeMap::from([(Severity::High, 3), (Severity::Medium, 1)])
        );
    }

    #[test]
    fn test_one_high_mismatch_is_necessary() {
        let items = vec![item(Severity::High, false), item(Severity::Low, false), item(Severity::High, true)];
        let summary = summarize(&items);

        assert!(summary.recommendation.to_lowercase().contains("necessary"));
        assert!(summary.manual_review_required);
        assert_eq!(summary.match_percentage, 33.33);
    }

    #[test]
    fn test_only_minor_mismatches_are_optional() {
        let items = vec![item(Severity::Medium, false), item(Severity::Low, false), item(Severity::High, true)];
        let summary = summarize(&items);

        assert!(summary.recommendation.to_lowercase().contains("optional"));
        assert!(!summary.manual_review_required);
        assert!(!summary.mismatches_by_severity.contains_key(&Severity::High));
    }

    #[test]
    fn test_empty_items() {
        let summary = summarize(&[]);
        assert_eq!(summary.match_percentage, 0.0);
        assert_eq!(summary.review_priority, ReviewPriority::Optional);
    }
}
