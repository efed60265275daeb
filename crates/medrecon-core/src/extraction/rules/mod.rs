//! Declarative rule tables for field extraction.
//!
//! Each field is resolved by an ordered [`RuleTable`]. Rules are tried in
//! declaration order and the first rule that yields a non-empty value wins,
//! so more specific labeled patterns are listed before bare fallbacks.

pub mod patterns;
pub mod supplies;

use regex::Regex;

/// Which part of a regex match becomes the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// A capture group.
    Group(usize),
    /// The whole match, label included.
    Whole,
}

/// One candidate pattern for a field.
#[derive(Debug)]
pub struct FieldRule {
    /// Short identifier, used in logs and tests.
    pub name: &'static str,
    pub pattern: Regex,
    pub capture: Capture,
}

impl FieldRule {
    /// Build a rule from a static pattern.
    ///
    /// Patterns are compile-time constants; an invalid one is a programming error.
    pub fn new(name: &'static str, pattern: &str, capture: Capture) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            capture,
        }
    }

    /// First match of this rule in `text`.
    pub fn find<'t>(&self, text: &'t str) -> Option<RuleMatch<'t>> {
        let caps = self.pattern.captures(text)?;
        let m = match self.capture {
            Capture::Group(i) => caps.get(i)?,
            Capture::Whole => caps.get(0)?,
        };
        let value = m.as_str().trim();
        if value.is_empty() {
            return None;
        }
        Some(RuleMatch {
            value,
            start: m.start(),
            rule: self.name,
        })
    }
}

/// A value produced by a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    /// Trimmed value.
    pub value: &'t str,
    /// Byte offset of the captured text.
    pub start: usize,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
}

/// Ordered list of candidate rules for one field. Index is priority.
#[derive(Debug)]
pub struct RuleTable {
    pub field: &'static str,
    rules: Vec<FieldRule>,
}

impl RuleTable {
    pub fn new(field: &'static str, rules: Vec<FieldRule>) -> Self {
        Self { field, rules }
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// First value produced by any rule, in priority order.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<RuleMatch<'t>> {
        self.rules.iter().find_map(|rule| rule.find(text))
    }

    /// Like [`first_match`](Self::first_match), but a rule's value must pass
    /// `accept`; a rejected value falls through to the next rule.
    pub fn first_accepted<'t>(
        &self,
        text: &'t str,
        accept: impl Fn(&RuleMatch<'t>) -> bool,
    ) -> Option<RuleMatch<'t>> {
        self.rules
            .iter()
            .filter_map(|rule| rule.find(text))
            .find(|m| accept(m))
    }

    /// Owned value of the first match.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.first_match(text).map(|m| m.value.to_string())
    }
}

/// Whether `value` is acceptable as a person name: longer than three
/// characters and not purely numeric.
pub fn is_plausible_name(value: &str) -> bool {
    let value = value.trim();
    value.chars().count() > 3 && !value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RuleTable {
        RuleTable::new(
            "test",
            vec![
                FieldRule::new("labeled", r"Label:\s*(\w+)", Capture::Group(1)),
                FieldRule::new("bare", r"\d{3}", Capture::Whole),
            ],
        )
    }

    #[test]
    fn test_first_rule_wins() {
        let t = table();
        let m = t.first_match("123 Label: abc").unwrap();
        assert_eq!(m.value, "abc");
        assert_eq!(m.rule, "labeled");
    }

    #[test]
    fn test_falls_back_in_order() {
        let t = table();
        let m = t.first_match("code 456").unwrap();
        assert_eq!(m.value, "456");
        assert_eq!(m.rule, "bare");
        assert!(t.first_match("nothing here").is_none());
    }

    #[test]
    fn test_rejected_value_falls_through() {
        let t = table();
        let m = t.first_accepted("Label: ab 789", |m| m.value.len() > 2).unwrap();
        assert_eq!(m.rule, "bare");
    }

    #[test]
    fn test_plausible_name() {
        assert!(is_plausible_name("Juan Perez"));
        assert!(!is_plausible_name("Ana"));
        assert!(!is_plausible_name("123456"));
        assert!(!is_plausible_name("  "));
    }
}
