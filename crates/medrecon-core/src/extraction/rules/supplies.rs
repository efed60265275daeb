//! Line-item supply scanning for the internal and hospital reports.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{ISO_DATE, LOT_CODE};
use crate::models::record::{HospitalSupply, InternalSupply};

lazy_static! {
    /// Candidate reference code: five or more digits, optionally dash-suffixed.
    static ref REFERENCE_TOKEN: Regex = Regex::new(r"\b(\d{5,}(?:-\d+)*)").unwrap();

    /// Supply keyword followed by its description, up to the first digit.
    static ref SUPPLY_NAME: Regex = Regex::new(r"(?i)\b(?:Tornillo|Placa|Pin|Torn)\b[^0-9]*").unwrap();

    /// Hospital lines name only complete keywords.
    static ref HOSPITAL_SUPPLY_NAME: Regex = Regex::new(r"(?i)\b(?:Tornillo|Placa|Pin)\b[^0-9]*").unwrap();

    static ref SUPPLY_KEYWORD: Regex = Regex::new(r"(?i)\b(?:Tornillo|Placa|Pin|Torn)\b").unwrap();

    /// Trailing label left on a supply name ("Tornillo encefálico REF:").
    static ref TRAILING_LABEL: Regex = Regex::new(r"(?i)\s*\b(?:REF|LOT|UDI|Cant\.?|Cantidad)\b.*$").unwrap();

    static ref LEADING_NUMBER: Regex = Regex::new(r"^(\d+)").unwrap();

    static ref HAS_TRACE_LABEL: Regex = Regex::new(r"(?i)LOT|REF").unwrap();

    static ref CODE_LABEL: Regex = Regex::new(r"(?i)\b(?:LOT|UDI)[:\s]*$").unwrap();
}

/// Observation attached to hospital lines without REF/LOT data.
pub const NO_TRACEABILITY_OBSERVATION: &str = "No traceability data";

/// Scan the internal report line by line for referenced supplies.
///
/// A line is a candidate when it carries a reference token of five or more
/// digits that is not itself labeled as a lot or UDI code. Lot and expiry
/// are searched within `window` lines around the reference line.
pub fn scan_internal_supplies(text: &str, quantity_ceiling: u32, window: usize) -> Vec<InternalSupply> {
    let lines: Vec<&str> = text.lines().collect();
    let mut supplies = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(reference) = find_reference(line) else {
            continue;
        };

        let from = i.saturating_sub(window);
        let to = (i + window).min(lines.len() - 1);
        let neighborhood = &lines[from..=to];

        let lot = neighborhood
            .iter()
            .find_map(|l| LOT_CODE.captures(l).map(|c| c[1].to_string()));
        let expiry_date = neighborhood
            .iter()
            .find_map(|l| ISO_DATE.captures(l).map(|c| c[1].to_string()));

        let label_present = lot.is_some() || expiry_date.is_some();

        supplies.push(InternalSupply {
            name: supply_name(&SUPPLY_NAME, line),
            quantity: leading_quantity(line, quantity_ceiling),
            reference: reference.to_string(),
            lot,
            expiry_date,
            label_present,
        });
    }

    supplies
}

/// Scan the hospital report for lines naming a supply keyword.
pub fn scan_hospital_supplies(text: &str, quantity_ceiling: u32) -> Vec<HospitalSupply> {
    text.lines()
        .filter(|line| SUPPLY_KEYWORD.is_match(line))
        .filter_map(|line| {
            let name = supply_name(&HOSPITAL_SUPPLY_NAME, line)?;
            let observations = (!HAS_TRACE_LABEL.is_match(line))
                .then(|| NO_TRACEABILITY_OBSERVATION.to_string());
            Some(HospitalSupply {
                name,
                quantity: leading_quantity(line, quantity_ceiling),
                observations,
            })
        })
        .collect()
}

fn find_reference(line: &str) -> Option<&str> {
    REFERENCE_TOKEN
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .find(|m| !CODE_LABEL.is_match(&line[..m.start()]))
        .map(|m| m.as_str())
}

fn supply_name(pattern: &Regex, line: &str) -> Option<String> {
    let raw = pattern.find(line)?.as_str();
    let without_label = TRAILING_LABEL.replace(raw, "");
    let name = without_label
        .trim()
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// A leading integer below the ceiling; larger numbers are codes.
fn leading_quantity(line: &str, ceiling: u32) -> Option<u32> {
    LEADING_NUMBER
        .captures(line.trim())
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|&n| n < ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_internal_supply_with_label_window() {
        let text = "\
LOT: 778899
5 Tornillo encefálico 2.0x6mm REF 102030
Vence 2027-03-31
Otra línea";

        let supplies = scan_internal_supplies(text, 1000, 2);
        assert_eq!(
            supplies,
            vec![InternalSupply {
                name: Some("Tornillo encefálico".to_string()),
                quantity: Some(5),
                reference: "102030".to_string(),
                lot: Some("778899".to_string()),
                expiry_date: Some("2027-03-31".to_string()),
                label_present: true,
            }]
        );
    }

    #[test]
    fn test_internal_supply_outside_window_has_no_label() {
        let text = "2 Placa curva REF 445566\na\nb\nc\nLOT 123";
        let supplies = scan_internal_supplies(text, 1000, 2);
        assert_eq!(supplies.len(), 1);
        assert_eq!(supplies[0].lot, None);
        assert!(!supplies[0].label_present);
    }

    #[test]
    fn test_code_sized_leading_number_is_not_quantity() {
        let supplies = scan_internal_supplies("123456 Tornillo", 1000, 2);
        assert_eq!(supplies.len(), 1);
        assert_eq!(supplies[0].quantity, None);
        assert_eq!(supplies[0].reference, "123456");

        let supplies = scan_internal_supplies("999 Pin REF 10203", 1000, 2);
        assert_eq!(supplies[0].quantity, Some(999));
    }

    #[test]
    fn test_lines_without_reference_are_discarded() {
        assert!(scan_internal_supplies("5 Tornillo encefálico\nLOT: 123456", 1000, 2).is_empty());
        assert!(scan_internal_supplies("", 1000, 2).is_empty());
    }

    #[test]
    fn test_hospital_supplies() {
        let text = "3 Tornillo encefálico 2.0mm\n150 Placa recta\nTorn suelto\nGasas";
        let supplies = scan_hospital_supplies(text, 100);

        assert_eq!(supplies.len(), 2);
        assert_eq!(supplies[0].name, "Tornillo encefálico");
        assert_eq!(supplies[0].quantity, Some(3));
        assert_eq!(supplies[0].observations.as_deref(), Some(NO_TRACEABILITY_OBSERVATION));
        assert_eq!(supplies[1].name, "Placa recta");
        assert_eq!(supplies[1].quantity, None);
    }

    #[test]
    fn test_hospital_line_with_ref_has_no_observation() {
        let supplies = scan_hospital_supplies("1 Pin Smartman REF 5", 100);
        assert_eq!(supplies[0].observations, None);
    }
}
