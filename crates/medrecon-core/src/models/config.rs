//! Configuration structures for extraction and reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::MedreconError;

/// Main configuration for medrecon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedreconConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Cross-document reconciliation configuration.
    pub reconciliation: ReconciliationConfig,

    /// OCR collaborator configuration.
    pub ocr: OcrConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Apply the known OCR misreading corrections before extraction.
    pub apply_ocr_corrections: bool,

    /// Leading numbers at or above this value on internal supply lines are codes, not quantities.
    pub internal_quantity_ceiling: u32,

    /// Same ceiling for hospital supply lines.
    pub hospital_quantity_ceiling: u32,

    /// Lines searched before and after a reference line for lot and expiry data.
    pub label_search_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            apply_ocr_corrections: true,
            internal_quantity_ceiling: 1000,
            hospital_quantity_ceiling: 100,
            label_search_window: 2,
        }
    }
}

/// Reconciliation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Minimum average similarity (0.0 - 1.0) for text fields to match.
    pub name_similarity_threshold: f64,

    /// Traceability indicators (out of 4) required for complete traceability.
    pub traceability_min_indicators: usize,

    /// Procedure values longer than this are shortened in discrepancy items.
    pub procedure_preview_chars: usize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            name_similarity_threshold: 0.8,
            traceability_min_indicators: 3,
            procedure_preview_chars: 50,
        }
    }
}

/// OCR collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language code passed to the OCR provider.
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "spa".to_string(),
        }
    }
}

impl MedreconConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.reconciliation.name_similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MedreconError::Config(format!(
                "name_similarity_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if !(1..=4).contains(&self.reconciliation.traceability_min_indicators) {
            return Err(MedreconError::Config(format!(
                "traceability_min_indicators must be between 1 and 4, got {}",
                self.reconciliation.traceability_min_indicators
            )));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(MedreconError::Config("ocr.language must not be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: MedreconConfig =
            serde_json::from_str(r#"{"reconciliation": {"name_similarity_threshold": 0.9}}"#)
                .unwrap();

        assert_eq!(config.reconciliation.name_similarity_threshold, 0.9);
        assert_eq!(config.reconciliation.traceability_min_indicators, 3);
        assert_eq!(config.extraction.internal_quantity_ceiling, 1000);
        assert_eq!(config.ocr.language, "spa");
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        assert!(MedreconConfig::default().validate().is_ok());

        let mut config = MedreconConfig::default();
        config.reconciliation.name_similarity_threshold = 1.5;
        assert!(matches!(config.validate(), Err(MedreconError::Config(_))));

        let mut config = MedreconConfig::default();
        config.reconciliation.traceability_min_indicators = 5;
        assert!(config.validate().is_err());

        let mut config = MedreconConfig::default();
        config.reconciliation.traceability_min_indicators = 0;
        assert!(matches!(config.validate(), Err(MedreconError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MedreconConfig::default();
        config.extraction.label_search_window = 3;
        config.save(&path).unwrap();

        assert_eq!(MedreconConfig::from_file(&path).unwrap(), config);
    }
}
