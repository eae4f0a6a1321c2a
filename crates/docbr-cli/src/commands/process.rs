//! Process command - extract a document record from one OCR output file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, info, warn};

use docbr_core::{
    DocumentExtractor, DocumentParser, DocumentRecord, DocumentType, ExtractionError, InputFormat,
    OcrResult, OutputFormat,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// OCR output file ("-" reads stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv or text (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Input format: lines, paddle or text (default from config)
    #[arg(short, long)]
    input_format: Option<InputFormat>,

    /// Declared document type, "auto" to classify
    #[arg(short = 't', long, value_enum, default_value = "auto")]
    document_type: DocumentTypeArg,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,

    /// Report validation problems
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DocumentTypeArg {
    /// Classify from the recognized text
    Auto,
    /// CPF card
    Cpf,
    /// Identity card
    Rg,
    /// Driving license
    Cnh,
}

impl DocumentTypeArg {
    pub fn type_override(self) -> Option<DocumentType> {
        match self {
            DocumentTypeArg::Auto => None,
            DocumentTypeArg::Cpf => Some(DocumentType::Cpf),
            DocumentTypeArg::Rg => Some(DocumentType::Rg),
            DocumentTypeArg::Cnh => Some(DocumentType::Cnh),
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;
    let input_format = args.input_format.unwrap_or(config.input.format);
    let format = args.format.unwrap_or(config.output.format);

    let is_stdin = args.input.as_os_str() == "-";
    if !is_stdin && !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing {} as {}", display_input(&args.input), input_format);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading OCR output...");
    let content = if is_stdin {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)?
    };

    pb.set_message("Parsing OCR output...");
    let ocr = OcrResult::parse(input_format, &content)
        .with_context(|| format!("Failed to parse {}", display_input(&args.input)))?;
    debug!("Parsed {} words in {} lines", ocr.word_count(), ocr.lines.len());

    pb.set_message("Extracting document fields...");
    let parser = DocumentParser::new().with_type_override(args.document_type.type_override());
    let record = extract_record(&parser, &ocr, config.input.reject_empty);

    pb.finish_and_clear();
    let mut record = record?;

    if args.validate {
        report_validation(&record);
    }

    if !config.output.include_raw_text {
        record.raw_text.clear();
    }

    let output = format_record(&record, format, config.output.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            record.confidence * 100.0
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            start.elapsed().as_millis()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run the parser, applying the empty-input policy.
pub fn extract_record(
    parser: &DocumentParser,
    ocr: &OcrResult,
    reject_empty: bool,
) -> anyhow::Result<DocumentRecord> {
    match parser.extract(ocr) {
        Ok(record) => Ok(record),
        Err(ExtractionError::NoTextDetected) if !reject_empty => {
            warn!("No text found in OCR input, writing an empty record");
            Ok(parser.process(&ocr.lines))
        }
        Err(ExtractionError::NoTextDetected) => anyhow::bail!("No text found in OCR input"),
        Err(e) => Err(e.into()),
    }
}

fn display_input(path: &Path) -> String {
    if path.as_os_str() == "-" {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn report_validation(record: &DocumentRecord) {
    if !record.validation_errors.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &record.validation_errors {
            eprintln!("  - {}", issue);
        }
    } else if !record.has_document_number() {
        eprintln!("{} No document number found", style("⚠").yellow());
    } else {
        eprintln!("{} Document numbers are valid", style("✓").green());
    }
}

/// Flat CSV row for a record.
#[derive(Serialize)]
struct RecordRow<'a> {
    document_type: &'a str,
    name: Option<&'a str>,
    birth_date: Option<&'a str>,
    rg_number: Option<&'a str>,
    cpf_number: Option<&'a str>,
    cnh_number: Option<&'a str>,
    cnh_category: Option<&'a str>,
    validity_date: Option<&'a str>,
    issuing_body: Option<&'a str>,
    confidence: String,
    is_valid: bool,
    validation_errors: String,
}

impl<'a> From<&'a DocumentRecord> for RecordRow<'a> {
    fn from(record: &'a DocumentRecord) -> Self {
        Self {
            document_type: record.document_type.as_str(),
            name: record.name.as_deref(),
            birth_date: record.birth_date.as_deref(),
            rg_number: record.rg_number.as_deref(),
            cpf_number: record.cpf_number.as_deref(),
            cnh_number: record.cnh_number.as_deref(),
            cnh_category: record.cnh_category.as_deref(),
            validity_date: record.validity_date.as_deref(),
            issuing_body: record.issuing_body.as_deref(),
            confidence: format!("{:.4}", record.confidence),
            is_valid: record.is_valid,
            validation_errors: record.validation_errors.join("; "),
        }
    }
}

pub fn format_record(record: &DocumentRecord, format: OutputFormat, pretty: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &DocumentRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.serialize(RecordRow::from(record))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &DocumentRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.document_type.as_str().to_uppercase()));
    if let Some(name) = &record.name {
        output.push_str(&format!("Name: {}\n", name));
    }
    output.push('\n');

    output.push_str("Numbers:\n");
    for (label, value) in [
        ("CPF", &record.cpf_number),
        ("RG", &record.rg_number),
        ("CNH", &record.cnh_number),
    ] {
        if let Some(value) = value {
            output.push_str(&format!("  {}: {}\n", label, value));
        }
    }
    if !record.has_document_number() {
        output.push_str("  (none)\n");
    }
    output.push('\n');

    if let Some(date) = &record.birth_date {
        output.push_str(&format!("Birth date: {}\n", date));
    }
    if let Some(date) = &record.validity_date {
        output.push_str(&format!("Valid until: {}\n", date));
    }

    output.push_str(&format!("Confidence: {:.1}%\n", record.confidence * 100.0));
    output.push_str(&format!("Valid: {}\n", if record.is_valid { "yes" } else { "no" }));
    for issue in &record.validation_errors {
        output.push_str(&format!("  - {}\n", issue));
    }

    output
}
