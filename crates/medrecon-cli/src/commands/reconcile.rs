//! Reconcile command - compare the documents of one surgery.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use chrono::Local;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info};

use medrecon_core::{
    DocumentType, Extractors, MedreconConfig, OcrProvider, PlainTextProvider, RecordSet,
    ReconciliationReport, Reconciler, StructuredRecord,
};

use super::{load_config, report_missing_fields};

/// Arguments for the reconcile command.
#[derive(Args)]
pub struct ReconcileArgs {
    /// Internal surgical expense report (document type 1)
    #[arg(long)]
    internal: Option<PathBuf>,

    /// Hospital surgical expense report (document type 2)
    #[arg(long)]
    hospital: Option<PathBuf>,

    /// Surgical description (document type 3)
    #[arg(long)]
    description: Option<PathBuf>,

    /// Load previously extracted records instead of documents
    #[arg(long, conflicts_with_all = ["internal", "hospital", "description"])]
    records: Option<PathBuf>,

    /// Save the extracted records as JSON
    #[arg(long)]
    save_records: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ReportFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON output
    Json,
    /// One CSV row per compared field
    Csv,
    /// Human readable report
    Text,
}

/// JSON envelope of a reconciliation run.
#[derive(Serialize)]
struct ReportOutput<'a> {
    generated_at: String,
    documents: Vec<DocumentType>,
    #[serde(flatten)]
    report: &'a ReconciliationReport,
}

pub async fn run(args: ReconcileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let records = match &args.records {
        Some(path) => RecordSet::from_file(path)
            .with_context(|| format!("Failed to load records from {}", path.display()))?,
        None => extract_documents(&args, &config).await?,
    };

    if records.is_empty() {
        anyhow::bail!("No documents supplied. Use --internal, --hospital, --description or --records.");
    }

    if let Some(path) = &args.save_records {
        fs::write(path, serde_json::to_string_pretty(&records)?)?;
        eprintln!("{} Records saved to {}", style("✓").green(), path.display());
    }

    let report = Reconciler::from_config(&config.reconciliation).reconcile(&records);
    let generated_at = Local::now().to_rfc3339();

    let output = match args.format {
        ReportFormat::Json => serde_json::to_string_pretty(&ReportOutput {
            generated_at,
            documents: records.present(),
            report: &report,
        })?,
        ReportFormat::Csv => format_csv(&report)?,
        ReportFormat::Text => format_text(&report, &records, &generated_at),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Report written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    info!("Reconciliation finished in {:?}", start.elapsed());
    Ok(())
}

/// Extract the given documents concurrently, one blocking task each.
async fn extract_documents(args: &ReconcileArgs, config: &MedreconConfig) -> anyhow::Result<RecordSet> {
    let inputs: Vec<(DocumentType, PathBuf)> = [
        (DocumentType::Internal, &args.internal),
        (DocumentType::Hospital, &args.hospital),
        (DocumentType::Description, &args.description),
    ]
    .into_iter()
    .filter_map(|(doc_type, path)| path.clone().map(|p| (doc_type, p)))
    .collect();

    if inputs.is_empty() {
        anyhow::bail!("No documents supplied. Use --internal, --hospital, --description or --records.");
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    pb.set_message("extracting");

    let extractors = Arc::new(Extractors::from_config(&config.extraction));
    let provider: Arc<dyn OcrProvider> = Arc::new(PlainTextProvider::new());

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|(doc_type, path)| {
            let extractors = Arc::clone(&extractors);
            let provider = Arc::clone(&provider);
            let language = config.ocr.language.clone();

            tokio::task::spawn_blocking(move || -> anyhow::Result<StructuredRecord> {
                debug!("Extracting {} from {}", doc_type, path.display());
                let text = provider
                    .extract_text(&path, &language)
                    .with_context(|| format!("Failed to read {} {}", doc_type.label(), path.display()))?;
                Ok(extractors.extract(doc_type, &text))
            })
        })
        .collect();

    let mut records = RecordSet::new();
    for handle in handles {
        let record = handle.await??;
        pb.inc(1);
        pb.set_message(record.document_type().label());
        report_missing_fields(&record);
        records.insert(record);
    }
    pb.finish_and_clear();

    Ok(records)
}

fn format_csv(report: &ReconciliationReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "field",
        "internal",
        "hospital",
        "description",
        "matches",
        "notes",
        "severity",
    ])?;

    for item in &report.items {
        wtr.write_record([
            item.field.as_str(),
            item.value_source_1.as_str(),
            item.value_source_2.as_str(),
            item.value_source_3.as_str(),
            if item.matches { "YES" } else { "NO" },
            item.notes.as_str(),
            &item.severity.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ReconciliationReport, records: &RecordSet, generated_at: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Reconciliation report ({})\n", generated_at));
    let documents: Vec<String> = records.present().iter().map(|t| t.to_string()).collect();
    output.push_str(&format!("Documents: {}\n\n", documents.join(", ")));

    for item in &report.items {
        let mark = if item.matches {
            style("✓").green()
        } else {
            style("✗").red()
        };
        output.push_str(&format!("{} {} [{}]\n", mark, item.field, item.severity));
        output.push_str(&format!(
            "    internal: {} | hospital: {} | description: {}\n",
            item.value_source_1, item.value_source_2, item.value_source_3
        ));
        output.push_str(&format!("    {}\n", item.notes));
    }

    let summary = &report.summary;
    output.push_str("\nSummary:\n");
    output.push_str(&format!(
        "  Matching fields: {}/{} ({}%)\n",
        summary.matching_fields, summary.total_fields_evaluated, summary.match_percentage
    ));
    for (severity, count) in &summary.mismatches_by_severity {
        output.push_str(&format!("  {} mismatches: {}\n", severity, count));
    }
    let review = if summary.manual_review_required {
        style("yes").red()
    } else {
        style("no").green()
    };
    output.push_str(&format!("  Manual review required: {}\n", review));
    output.push_str(&format!("  {}\n", summary.recommendation));

    output
}
