//! Field comparators.
//!
//! Every comparator takes the values of up to three sources, in source
//! order, and yields a match flag with a short rationale. A comparison that
//! has nothing to compare is a mismatch, never an error.

use std::collections::{BTreeMap, BTreeSet};

use super::similarity::ratio;
use super::synonyms::canonicalize;
use crate::extraction::rules::patterns::DATE_TOKEN;
use crate::extraction::text::normalize;
use crate::models::record::TraceabilityFlags;

/// Outcome of a single comparator.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub matches: bool,
    pub notes: String,
}

impl Comparison {
    fn matched(notes: impl Into<String>) -> Self {
        Self {
            matches: true,
            notes: notes.into(),
        }
    }

    fn mismatched(notes: impl Into<String>) -> Self {
        Self {
            matches: false,
            notes: notes.into(),
        }
    }
}

/// Dates match when every source that has a date token has the same one.
pub fn compare_dates(values: &[Option<&str>]) -> Comparison {
    let tokens: Vec<String> = values
        .iter()
        .flatten()
        .filter_map(|value| DATE_TOKEN.extract(value))
        .collect();

    let distinct: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();

    match distinct.len() {
        0 => Comparison::mismatched("No valid dates found"),
        1 => Comparison::matched(format!("All dates match: {}", tokens[0])),
        _ => Comparison::mismatched(format!(
            "Different dates found: {}",
            distinct.into_iter().collect::<Vec<_>>().join(", ")
        )),
    }
}

/// Free-text values match when their average pairwise similarity reaches `threshold`.
pub fn compare_names(values: &[Option<&str>], threshold: f64) -> Comparison {
    let names: Vec<String> = values
        .iter()
        .flatten()
        .map(|value| normalize(value))
        .filter(|name| !name.is_empty() && name != "n/a")
        .collect();

    if names.is_empty() {
        return Comparison::mismatched("No valid names found");
    }
    if names.len() == 1 {
        return Comparison::matched(format!("Only one value available: {}", names[0]));
    }

    let mut similarities = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            similarities.push(ratio(a, b));
        }
    }
    let average = similarities.iter().sum::<f64>() / similarities.len() as f64;

    if average >= threshold {
        Comparison::matched(format!("Similar values (similarity: {:.2})", average))
    } else {
        Comparison::mismatched(format!(
            "Different values (similarity: {:.2}): {}",
            average,
            names.join(", ")
        ))
    }
}

/// Canonical supply name to the quantity reported by one source.
///
/// When several entries share a canonical name the last quantity reported
/// wins. An entry without a quantity only registers the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyTally(BTreeMap<String, Option<u32>>);

impl SupplyTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, raw_name: &str, quantity: Option<u32>) {
        let name = canonicalize(raw_name);
        if name.is_empty() {
            return;
        }
        let slot = self.0.entry(name).or_insert(None);
        if quantity.is_some() {
            *slot = quantity;
        }
    }

    pub fn get(&self, name: &str) -> Option<Option<u32>> {
        self.0.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Option<u32>)> for SupplyTally {
    fn from_iter<I: IntoIterator<Item = (&'a str, Option<u32>)>>(iter: I) -> Self {
        let mut tally = SupplyTally::new();
        for (name, quantity) in iter {
            tally.add(name, quantity);
        }
        tally
    }
}

/// Supplies match when no canonical name has two different quantities.
///
/// A supply missing from some sources is not a conflict.
pub fn compare_supplies(sources: &[SupplyTally]) -> Comparison {
    let names: BTreeSet<&str> = sources.iter().flat_map(|s| s.names()).collect();
    if names.is_empty() {
        return Comparison::mismatched("No supplies found in any document");
    }

    let mut agreements = Vec::new();
    let mut conflicts = Vec::new();

    for name in names {
        let per_source: Vec<Option<Option<u32>>> = sources.iter().map(|s| s.get(name)).collect();
        let quantities: BTreeSet<u32> = per_source.iter().flatten().flatten().copied().collect();

        if quantities.len() <= 1 {
            match quantities.first() {
                Some(quantity) => agreements.push(format!("{}: {}", name, quantity)),
                None => agreements.push(name.to_string()),
            }
        } else {
            let detail: Vec<String> = per_source
                .iter()
                .enumerate()
                .map(|(i, entry)| format!("S{}:{}", i + 1, describe_quantity(*entry)))
                .collect();
            conflicts.push(format!("{} - {}", name, detail.join(", ")));
        }
    }

    if conflicts.is_empty() {
        Comparison::matched(format!("Supplies match: {}", preview(&agreements, 3)))
    } else {
        Comparison::mismatched(format!("Discrepancies: {}", preview(&conflicts, 2)))
    }
}

fn describe_quantity(entry: Option<Option<u32>>) -> String {
    match entry {
        Some(Some(quantity)) => quantity.to_string(),
        Some(None) => "no quantity".to_string(),
        None => "absent".to_string(),
    }
}

/// First `limit` entries joined by "; ", with "..." when some were left out.
fn preview(entries: &[String], limit: usize) -> String {
    let shown = entries.iter().take(limit).cloned().collect::<Vec<_>>().join("; ");
    if entries.len() > limit {
        format!("{}...", shown)
    } else {
        shown
    }
}

/// Assess the internal report's traceability indicators.
///
/// Complete with at least `min_indicators` of the four present; anything
/// less never matches.
pub fn assess_traceability(flags: Option<&TraceabilityFlags>, min_indicators: usize) -> Comparison {
    let Some(flags) = flags else {
        return Comparison::mismatched("No data from the internal report");
    };

    let indicators = flags.indicators();
    let present: Vec<&str> = indicators.iter().filter(|(_, p)| *p).map(|(n, _)| *n).collect();
    let missing: Vec<&str> = indicators.iter().filter(|(_, p)| !*p).map(|(n, _)| *n).collect();

    if present.len() >= min_indicators {
        Comparison::matched(format!("Complete traceability: {}", present.join(", ")))
    } else if !present.is_empty() {
        Comparison::mismatched(format!(
            "Partial traceability. Present: {}. Missing: {}",
            present.join(", "),
            missing.join(", ")
        ))
    } else {
        Comparison::mismatched("No traceability data")
    }
}
