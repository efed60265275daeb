//! Extract command - turn one document into a structured record.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use medrecon_core::{DocumentType, Extractors, OcrProvider, PlainTextProvider, StructuredRecord};

use super::{load_config, report_missing_fields};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input document (OCR text output)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type: 1 (internal report), 2 (hospital report), 3 (surgical description)
    #[arg(short = 't', long = "type")]
    doc_type: DocumentType,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: RecordFormat,

    /// Do not apply the OCR correction table
    #[arg(long)]
    no_corrections: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RecordFormat {
    /// JSON output
    Json,
    /// One `field: value` line per extracted field
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;
    if args.no_corrections {
        config.extraction.apply_ocr_corrections = false;
    }

    info!("Extracting {} from {}", args.doc_type, args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Reading {}...", args.input.display()));

    let text = PlainTextProvider::new()
        .extract_text(&args.input, &config.ocr.language)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    pb.set_message(format!("Extracting {}...", args.doc_type.label()));
    let record = Extractors::from_config(&config.extraction).extract(args.doc_type, &text);
    pb.finish_and_clear();

    report_missing_fields(&record);

    let output = match args.format {
        RecordFormat::Json => serde_json::to_string_pretty(&record)?,
        RecordFormat::Text => format_text(&record)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Record written to {} in {:?}",
            style("✓").green(),
            output_path.display(),
            start.elapsed()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(record: &StructuredRecord) -> anyhow::Result<String> {
    let mut output = format!("{}\n\n", record.document_type());
    let value = serde_json::to_value(record)?;
    flatten_fields(&mut output, "", &value);
    Ok(output)
}

/// Write scalar leaves as `path: value` lines, with dotted object paths and
/// indexed array paths.
fn flatten_fields(output: &mut String, prefix: &str, value: &serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if prefix.is_empty() && key == "document_type" {
                    continue;
                }
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_fields(output, &path, child);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_fields(output, &format!("{}[{}]", prefix, i), child);
            }
        }
        Value::String(s) => output.push_str(&format!("{}: {}\n", prefix, s)),
        Value::Null => {}
        other => output.push_str(&format!("{}: {}\n", prefix, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrecon_core::HospitalReport;

    #[test]
    fn test_text_format_flattens_nested_fields() {
        let record = StructuredRecord::Hospital(HospitalReport {
            surgeon: Some("Dr. Carlos Ruiz".to_string()),
            supplies: vec![medrecon_core::models::record::HospitalSupply {
                name: "Placa recta".to_string(),
                quantity: Some(1),
                observations: None,
            }],
            ..Default::default()
        });

        let text = format_text(&record).unwrap();
        assert!(text.starts_with("Hospital report (2)"));
        assert!(text.contains("surgeon: Dr. Carlos Ruiz\n"));
        assert!(text.contains("supplies[0].name: Placa recta\n"));
        assert!(text.contains("supplies[0].quantity: 1\n"));
        assert!(!text.contains("document_type"));
    }
}
