//! Rule tables and regex patterns for the surgical document templates.
//!
//! Tables are built once and shared by all extractors. Name captures use
//! the Spanish letter set `A-Za-zÁÉÍÓÚÜÑáéíóúüñ`.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Capture, FieldRule, RuleTable};

lazy_static! {
    // Patient name (internal and hospital reports)
    pub static ref PATIENT_NAME: RuleTable = RuleTable::new("patient_name", vec![
        FieldRule::new(
            "por",
            r"(?i)\bpor\s+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|\d{10}|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "paciente",
            r"(?im)Paciente[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "cliente",
            r"(?im)Cliente[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
    ]);

    // Report date
    pub static ref REPORT_DATE: RuleTable = RuleTable::new("report_date", vec![
        FieldRule::new(
            "labeled_dmy",
            r"(?i)Fecha[:\s]+(\d{1,2}[-/]\d{1,2}[-/](?:\d{4}|\d{2}))\b",
            Capture::Group(1),
        ),
        FieldRule::new(
            "labeled_ymd",
            r"(?i)Fecha[:\s]+(\d{4}[-/]\d{1,2}[-/]\d{1,2})\b",
            Capture::Group(1),
        ),
        FieldRule::new("bare_dmy", r"\b(\d{1,2}[-/]\d{1,2}[-/](?:\d{4}|\d{2}))\b", Capture::Group(1)),
        FieldRule::new("bare_ymd", r"\b(\d{4}[-/]\d{1,2}[-/]\d{1,2})\b", Capture::Group(1)),
    ]);

    /// Date tokens accepted by the date comparator, in priority order.
    pub static ref DATE_TOKEN: RuleTable = RuleTable::new("date_token", vec![
        FieldRule::new("dmy_slash", r"\b\d{1,2}/\d{1,2}/\d{4}\b", Capture::Whole),
        FieldRule::new("dmy_dash", r"\b\d{1,2}-\d{1,2}-\d{4}\b", Capture::Whole),
        FieldRule::new("ymd_slash", r"\b\d{4}/\d{1,2}/\d{1,2}\b", Capture::Whole),
        FieldRule::new("ymd_dash", r"\b\d{4}-\d{1,2}-\d{1,2}\b", Capture::Whole),
    ]);

    // Procedure line, label included
    pub static ref PROCEDURE: RuleTable = RuleTable::new("procedure", vec![
        FieldRule::new("procedimiento", r"(?i)Procedimiento[:\s]+[^\n]+", Capture::Whole),
        FieldRule::new("osteosintesis", r"(?i)Osteos[ií]ntesis[^\n]*", Capture::Whole),
        FieldRule::new("procedmeo", r"(?i)Procedmeo[:\s]+[^\n]+", Capture::Whole),
    ]);

    // Responsible physician (internal report)
    pub static ref RESPONSIBLE_PHYSICIAN: RuleTable = RuleTable::new("responsible_physician", vec![
        FieldRule::new(
            "especialista",
            r"(?i)Especialista[:\s]+(Dr\.?\s*[A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "bare_dr",
            r"(?i)\b(Dr\.?\s*[A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|Procedimiento)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "medico",
            r"(?i)M[ée]dico[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
    ]);

    // Surgeon (hospital report)
    pub static ref SURGEON: RuleTable = RuleTable::new("surgeon", vec![
        FieldRule::new(
            "cirujano",
            r"(?i)Cirujano[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s\.]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "especialista",
            r"(?i)Especialista[:\s]+(Dr\.?\s*[A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|Procedimiento|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "medico",
            r"(?i)M[ée]dico[:\s]+(Dr\.?\s*[A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "bare_dr",
            r"(?i)\b(Dr\.?\s*[A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|Procedimiento|$)",
            Capture::Group(1),
        ),
    ]);

    // City or place
    pub static ref LOCATION: RuleTable = RuleTable::new("location", vec![
        FieldRule::new(
            "known_city",
            r"(?i)\b(Bucaramanga|Bogot[áa]|Medell[íi]n|Cali|Barranquilla)\b",
            Capture::Group(1),
        ),
        // OCR usually splits "Localidad" on these templates
        FieldRule::new("locality_fragment", r"(?i)slidad\s+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ]+)", Capture::Group(1)),
        FieldRule::new("ciudad", r"(?i)Ciudad[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ]+)", Capture::Group(1)),
    ]);

    // Signature block (internal report)
    pub static ref SIGNATURES: RuleTable = RuleTable::new("signatures", vec![
        FieldRule::new("firma_y", r"(?i)Firmay?\s+([^\n]+)", Capture::Group(1)),
        FieldRule::new("firma", r"(?i)Firma[:\s]+([^\n]+)", Capture::Group(1)),
        FieldRule::new("instrumentador", r"(?i)Instrumentador[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    // Document-wide traceability indicators (internal report)
    pub static ref REF_CODE: Regex = Regex::new(r"(?i)REF[:\s]*(\d+)").unwrap();
    pub static ref LOT_CODE: Regex = Regex::new(r"(?i)LOT[:\s]*(\d+)").unwrap();
    pub static ref UDI_CODE: Regex = Regex::new(r"(?i)UDI[:\s]*\d+").unwrap();
    pub static ref ISO_DATE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();

    // Administrative data (hospital report)
    pub static ref INSURER: RuleTable = RuleTable::new("insurer", vec![
        FieldRule::new("asegurador", r"(?i)Asegurador[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    pub static ref REFERRAL_NUMBER: RuleTable = RuleTable::new("referral_number", vec![
        FieldRule::new("remision", r"(?i)Remisi[óo]n[:\s]+(\w+)", Capture::Group(1)),
    ]);

    pub static ref REPORT_CODE: RuleTable = RuleTable::new("report_code", vec![
        FieldRule::new("codigo", r"(?i)C[óo]digo[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    /// Generic `Label: value` line, feeding the overflow maps.
    pub static ref LABELED_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Za-zÁÉÍÓÚÜÑáéíóúüñ][A-Za-zÁÉÍÓÚÜÑáéíóúüñ .]{1,40}?)[ \t]*:[ \t]*(\S[^\n]*)$"
    ).unwrap();

    // Complementary data (surgical description)
    pub static ref DESCRIPTION_DATE: RuleTable = RuleTable::new("complementary.date", vec![
        FieldRule::new(
            "labeled",
            r"(?i)Fecha[:\s]+(\d{1,2}[-/]\d{1,2}[-/]\d{4}|\d{4}[-/]\d{1,2}[-/]\d{1,2})\b",
            Capture::Group(1),
        ),
        FieldRule::new("dmy", r"\b(\d{1,2}[-/]\d{1,2}[-/]\d{4})\b", Capture::Group(1)),
        FieldRule::new("ymd", r"\b(\d{4}[-/]\d{1,2}[-/]\d{1,2})\b", Capture::Group(1)),
        FieldRule::new("fecha", r"(?i)Fecha[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    pub static ref DESCRIPTION_PATIENT: RuleTable = RuleTable::new("complementary.patient", vec![
        FieldRule::new(
            "paciente",
            r"(?i)paciente[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "nombre",
            r"(?i)Nombre[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "cc",
            r"(?i)CC[:\s]+\d+[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
    ]);

    pub static ref ATTENDING_PHYSICIAN: RuleTable = RuleTable::new("complementary.attending_physician", vec![
        FieldRule::new(
            "medico_tratante",
            r"(?i)M[ée]dico\s+Tratante[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s\.]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "cirujano",
            r"(?i)Cirujano[:\s]+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s\.]+?)(?:\n|$)",
            Capture::Group(1),
        ),
        FieldRule::new(
            "dr",
            r"(?i)\bDr\.\s+([A-Za-zÁÉÍÓÚÜÑáéíóúüñ\s]+?)(?:\n|$)",
            Capture::Group(1),
        ),
    ]);

    pub static ref SPECIALTY: RuleTable = RuleTable::new("complementary.specialty", vec![
        FieldRule::new("especialidad", r"(?i)Especialidad[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    pub static ref ANESTHESIA_TYPE: RuleTable = RuleTable::new("complementary.anesthesia_type", vec![
        FieldRule::new("tipo_anestesia", r"(?i)Tipo\s+de\s+anestesia[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    pub static ref MEDICAL_CENTER: RuleTable = RuleTable::new("complementary.medical_center", vec![
        FieldRule::new("hospital_header", r"(?im)^[ \t]*HOSPITAL\s+([^\n]+)", Capture::Group(1)),
        FieldRule::new("centro", r"(?i)Centro[:\s]+([^\n]+)", Capture::Group(1)),
        FieldRule::new("institucion", r"(?i)Instituci[óo]n[:\s]+([^\n]+)", Capture::Group(1)),
    ]);

    /// Procedure codes such as T020 or T90B2.
    pub static ref PROCEDURE_CODE: Regex = Regex::new(r"\bT\d+[A-Z]*\d*\b").unwrap();

    // Narrative (surgical description)
    pub static ref NARRATIVE_MARKER: Regex = Regex::new(
        r"(?i)(\bT\d+|Cirujano\s+\d+|Pre-Quir[úu]rgico|Post-Quir[úu]rgico)"
    ).unwrap();

    pub static ref TRACEABILITY_KEYWORD: Regex = Regex::new(r"(?i)(REF|LOT|etiqueta|trazabilidad)").unwrap();
    pub static ref LABEL_MENTION: Regex = Regex::new(r"(?i)etiquetas?").unwrap();
    pub static ref TRACEABILITY_MENTION: Regex = Regex::new(r"(?i)trazabilidad").unwrap();

    /// Narrative supply mentions and their canonical names, in priority order.
    pub static ref SUPPLY_MENTIONS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\bosteos[ií]ntesis\s+encef[aá]lica?\s*[^\n]*").unwrap(), "Osteosíntesis Encefálica"),
        (Regex::new(r"(?i)\btorn(?:illo)?s?\s*encef[aá]lic[oa]?[^\n]*").unwrap(), "Tornillo Encefálico"),
        (Regex::new(r"(?i)\bplaca\s*curv[ae]?nerv?[^\n]*").unwrap(), "Placa CurvaNerv"),
        (Regex::new(r"(?i)\bpin\s*smartman[^\n]*").unwrap(), "Pin Smartman"),
        (Regex::new(r"(?i)\bdispositivos?\s+de\s+fijaci[óo]n[^\n]*").unwrap(), "Dispositivo de Fijación"),
        (Regex::new(r"(?i)\bdispositivos?\s+de\s+osteos[ií]ntesis[^\n]*").unwrap(), "Dispositivo de Osteosíntesis"),
        (Regex::new(r"(?i)\bfracturas?\s+[^\n]*").unwrap(), "Manejo de Fracturas"),
        (Regex::new(r"(?i)\bfijaci[óo]n\s+[^\n]*").unwrap(), "Fijación Quirúrgica"),
        (Regex::new(r"(?i)\breducci[óo]n\s+[^\n]*").unwrap(), "Reducción Quirúrgica"),
        (Regex::new(r"(?i)\bcraneofacial[^\n]*").unwrap(), "Cirugía Craneofacial"),
        (Regex::new(r"(?i)\bmaxilofacial[^\n]*").unwrap(), "Cirugía Maxilofacial"),
        (Regex::new(r"(?i)\btemporal[^\n]*fractura[^\n]*").unwrap(), "Fractura Temporal"),
        (Regex::new(r"(?i)\bfrontal[^\n]*fractura[^\n]*").unwrap(), "Fractura Frontal"),
        (Regex::new(r"(?i)\bparietal[^\n]*fractura[^\n]*").unwrap(), "Fractura Parietal"),
        (Regex::new(r"(?i)\btornillos?[^\n]*").unwrap(), "Tornillos"),
        (Regex::new(r"(?i)\bplacas?[^\n]*").unwrap(), "Placas"),
        (Regex::new(r"(?i)\bpin(?:es)?\b[^\n]*").unwrap(), "Pines"),
    ];
}

/// Surgical keywords that mark a line as part of the procedure narrative.
pub const NARRATIVE_KEYWORDS: &[&str] = &[
    "osteosintesis",
    "encefalica",
    "craneofacial",
    "fractura",
    "temporal",
    "parietal",
    "frontal",
    "fijacion",
    "dispositivo",
    "reduccion",
    "cirugia",
    "quirurgico",
    "anestesia",
    "incision",
    "sutura",
    "craneales",
    "maxilofacial",
    "neurocirugia",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_date_prefers_labeled_form() {
        let text = "Vence 2026-01-31\nFecha: 10/05/2024";
        let m = REPORT_DATE.first_match(text).unwrap();
        assert_eq!(m.value, "10/05/2024");
        assert_eq!(m.rule, "labeled_dmy");
    }

    #[test]
    fn test_report_date_formats() {
        assert_eq!(REPORT_DATE.extract("el 5-3-24 en sala").as_deref(), Some("5-3-24"));
        assert_eq!(REPORT_DATE.extract("Fecha: 2024/05/10").as_deref(), Some("2024/05/10"));
        assert_eq!(REPORT_DATE.extract("registro 2024-05-10").as_deref(), Some("2024-05-10"));
        assert_eq!(REPORT_DATE.extract("sin fecha"), None);
    }

    #[test]
    fn test_date_token_does_not_split_iso_dates() {
        let m = DATE_TOKEN.first_match("2024-05-10").unwrap();
        assert_eq!(m.value, "2024-05-10");
        assert_eq!(m.rule, "ymd_dash");
    }

    #[test]
    fn test_patient_name_priority() {
        let text = "Paciente: Maria Lopez\nRealizado por Juan Perez\n";
        let m = PATIENT_NAME.first_match(text).unwrap();
        assert_eq!(m.value, "Juan Perez");
        assert_eq!(m.rule, "por");
    }

    #[test]
    fn test_location_does_not_match_inside_words() {
        assert_eq!(LOCATION.extract("Control de calidad aprobado"), None);
        assert_eq!(LOCATION.extract("Ciudad: Cúcuta").as_deref(), Some("Cúcuta"));
        assert_eq!(LOCATION.extract("Clínica en Bogotá").as_deref(), Some("Bogotá"));
    }

    #[test]
    fn test_procedure_keeps_label() {
        let text = "Procedimiento: Osteosíntesis encefálica\nOtro";
        assert_eq!(
            PROCEDURE.extract(text).as_deref(),
            Some("Procedimiento: Osteosíntesis encefálica")
        );
    }

    #[test]
    fn test_labeled_line() {
        let caps = LABELED_LINE.captures("  Habitación: 302\n").unwrap();
        assert_eq!(&caps[1], "Habitación");
        assert_eq!(&caps[2], "302");
    }
}
