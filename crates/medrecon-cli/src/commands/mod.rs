//! Subcommands of the `medrecon` binary.

pub mod config;
pub mod extract;
pub mod reconcile;

use std::path::Path;

use console::style;
use tracing::{debug, warn};

use medrecon_core::{MedreconConfig, StructuredRecord};

/// Load the configuration used by the processing commands.
///
/// An explicit `--config` path must exist. Without one, the user config
/// file is used when present, otherwise the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MedreconConfig> {
    let config = match config_path {
        Some(path) => MedreconConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                MedreconConfig::from_file(&default_path)?
            } else {
                MedreconConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Report fields the extractor could not find, on stderr.
pub fn report_missing_fields(record: &StructuredRecord) {
    let missing = record.missing_fields();
    if missing.is_empty() {
        return;
    }

    let doc_type = record.document_type();
    warn!("{}: missing fields: {}", doc_type.label(), missing.join(", "));
    eprintln!(
        "{} {}: not found: {}",
        style("!").yellow(),
        doc_type.label(),
        missing.join(", ")
    );
}
