//! Batch processing command for multiple OCR output files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use docbr_core::{DocumentParser, DocumentRecord, InputFormat, OcrResult, OutputFormat};

use super::process::{extract_record, format_record, DocumentTypeArg};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Input format; `.txt` files default to text (default from config)
    #[arg(short, long)]
    input_format: Option<InputFormat>,

    /// Declared document type, "auto" to classify
    #[arg(short = 't', long, value_enum, default_value = "auto")]
    document_type: DocumentTypeArg,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<DocumentRecord, String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;
    let format = args.format.unwrap_or(config.output.format);
    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let continue_on_error = args.continue_on_error || config.batch.continue_on_error;
    let summary = args.summary || config.batch.summary;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(DocumentParser::new().with_type_override(args.document_type.type_override()));
    let semaphore = Arc::new(Semaphore::new(jobs));
    let mut handles = Vec::with_capacity(files.len());

    debug!("Processing {} files with {} workers", files.len(), jobs);

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let pb = overall_pb.clone();
        let input_format = input_format_for(&path, args.input_format, config.input.format);
        let reject_empty = config.input.reject_empty;

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();

            let outcome = process_single_file(&path, &parser, input_format, reject_empty)
                .map_err(|e| format!("{:#}", e));
            pb.inc(1);

            ProcessResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    // Joined in submission order, so results keep the input order
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        if let Err(ref e) = result.outcome {
            if continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), e);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), e);
            }
        }

        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    let successful = results.iter().filter(|r| r.outcome.is_ok()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();

    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            let Ok(record) = &result.outcome else {
                continue;
            };

            let mut record = record.clone();
            if !config.output.include_raw_text {
                record.raw_text.clear();
            }

            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");
            let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

            let content = format_record(&record, format, config.output.pretty)?;
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(e) = &result.outcome {
                println!("  - {}: {}", result.path.display(), e);
            }
        }
    }

    Ok(())
}

/// Explicit format, then `.txt` as plain text, then the configured default.
fn input_format_for(path: &Path, explicit: Option<InputFormat>, default: InputFormat) -> InputFormat {
    if let Some(format) = explicit {
        return format;
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("txt") => InputFormat::Text,
        _ => default,
    }
}

fn process_single_file(
    path: &Path,
    parser: &DocumentParser,
    input_format: InputFormat,
    reject_empty: bool,
) -> anyhow::Result<DocumentRecord> {
    let content = fs::read_to_string(path)?;
    let ocr = OcrResult::parse(input_format, &content)
        .with_context(|| format!("Failed to parse as {}", input_format))?;

    extract_record(parser, &ocr, reject_empty)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let generated_at = chrono::Utc::now().to_rfc3339();
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "document_number",
        "cpf_number",
        "rg_number",
        "cnh_number",
        "name",
        "is_valid",
        "confidence",
        "processing_time_ms",
        "error",
        "generated_at",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processing_time_ms = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(record) => {
                wtr.write_record([
                    filename,
                    "success",
                    record.document_type.as_str(),
                    record.document_number().unwrap_or(""),
                    record.cpf_number.as_deref().unwrap_or(""),
                    record.rg_number.as_deref().unwrap_or(""),
                    record.cnh_number.as_deref().unwrap_or(""),
                    record.name.as_deref().unwrap_or(""),
                    if record.is_valid { "true" } else { "false" },
                    &format!("{:.2}", record.confidence),
                    &processing_time_ms,
                    "",
                    &generated_at,
                ])?;
            }
            Err(e) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &processing_time_ms,
                    e,
                    &generated_at,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
