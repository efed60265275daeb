//! Text cleanup shared by extraction and reconciliation.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

lazy_static! {
    /// Known OCR misreadings of the surgical templates, applied in order.
    static ref OCR_CORRECTIONS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)Torn\s+enceçálico").unwrap(), "Tornillo encefálico"),
        (Regex::new(r"(?i)Tôrn\s+encefálico").unwrap(), "Tornillo encefálico"),
        (Regex::new(r"(?i)curvanervios").unwrap(), "CurvaNerv"),
        (Regex::new(r"(?i)Especialeta").unwrap(), "Especialista"),
        (Regex::new(r"(?i)Procedmeo").unwrap(), "Procedimiento"),
        (Regex::new(r"(?i)Fecho").unwrap(), "Fecha"),
        (Regex::new(r"(?i)Remitión").unwrap(), "Remisión"),
    ];
}

/// Normalize text for comparison.
///
/// Lower-cases, strips diacritics, collapses whitespace runs to a single
/// space and trims. Idempotent.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the OCR correction table to raw text.
///
/// Every correction runs over the whole text; line structure is kept.
pub fn correct(text: &str) -> String {
    let mut corrected = text.to_string();
    for (pattern, replacement) in OCR_CORRECTIONS.iter() {
        if pattern.is_match(&corrected) {
            corrected = pattern.replace_all(&corrected, *replacement).into_owned();
        }
    }
    corrected
}

/// Capitalize each whitespace separated word ("JUAN pérez" -> "Juan Pérez").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_folds() {
        assert_eq!(normalize("  Juan   Pérez\n"), "juan perez");
        assert_eq!(normalize("JUAN PEREZ"), "juan perez");
        assert_eq!(normalize("juan\t\tperez"), "juan perez");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "  Osteosíntesis   ENCEFÁLICA ",
            "Señora Muñoz\n\tÜber",
            "İstanbul Ǆemal",
            "10/05/2024 registrado",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_correct_known_misreadings() {
        let text = "Fecho: 10/05/2024\nProcedmeo: Osteosíntesis\nEspecialeta: Dr. Ruiz";
        let corrected = correct(text);
        assert_eq!(
            corrected,
            "Fecha: 10/05/2024\nProcedimiento: Osteosíntesis\nEspecialista: Dr. Ruiz"
        );
    }

    #[test]
    fn test_correct_is_case_insensitive_and_ordered() {
        assert_eq!(correct("torn enceçálico 2.0mm"), "Tornillo encefálico 2.0mm");
        assert_eq!(correct("Placa CURVANERVIOS"), "Placa CurvaNerv");
        assert_eq!(correct("sin errores"), "sin errores");
        assert_eq!(correct(""), "");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("JUAN   pérez"), "Juan Pérez");
        assert_eq!(title_case(""), "");
    }
}
