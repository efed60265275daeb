//! Supply name canonicalization.

use crate::extraction::text::normalize;

/// Canonical supply keys and the substrings that identify them, in priority order.
pub const SUPPLY_SYNONYMS: &[(&str, &[&str])] = &[
    ("cateter", &["cateter", "sonda", "tubo"]),
    ("gasa", &["gasa", "compresa", "gasas"]),
    ("sutura", &["sutura", "hilo", "punto"]),
    ("bisturi", &["bisturi", "cuchilla", "escalpelo"]),
    ("aguja", &["aguja", "inyector", "puncion"]),
    ("tornillo", &["tornillo", "torn"]),
    ("placa", &["placa"]),
];

/// Collapse a raw supply name to its canonical key.
///
/// The name is normalized first. The first key with a synonym contained in
/// the normalized name wins; otherwise the normalized name is its own key.
pub fn canonicalize(raw: &str) -> String {
    let name = normalize(raw);
    SUPPLY_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.iter().any(|s| name.contains(s)))
        .map(|(key, _)| key.to_string())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms_collapse() {
        assert_eq!(canonicalize("Sonda Foley 16Fr"), "cateter");
        assert_eq!(canonicalize("COMPRESA estéril"), "gasa");
        assert_eq!(canonicalize("Hilo de sutura"), "sutura");
        assert_eq!(canonicalize("Punción lumbar"), "aguja");
        assert_eq!(canonicalize("Tornillo encefálico 2.0mm"), "tornillo");
        assert_eq!(canonicalize("Torn encefálico"), "tornillo");
        assert_eq!(canonicalize("Placa CurvaNerv"), "placa");
    }

    #[test]
    fn test_table_order_decides_ties() {
        // "tubo" (cateter) is listed before "gasa"
        assert_eq!(canonicalize("tubo con gasa"), "cateter");
    }

    #[test]
    fn test_unknown_name_is_its_own_key() {
        assert_eq!(canonicalize("  Pin   Smartman "), "pin smartman");
        assert_eq!(canonicalize(""), "");
    }
}
