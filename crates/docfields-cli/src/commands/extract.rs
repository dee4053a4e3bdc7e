//! Extract command - pull structured fields from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use docfields_core::models::{export_file_name, ExportFormat};
use docfields_core::{
    Completeness, DocfieldsConfig, DocumentSession, ExportRecord, FieldMap, FieldRuleSet,
    MediaKind, Overrides, PdfTextExtractor, TextExtractor,
};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file: PDF, or the recognized text of a scan (.txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Correct a field before export, e.g. --set last_name=Durand (empty value clears it)
    #[arg(short, long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Show the completeness score
    #[arg(long)]
    show_confidence: bool,

    /// Show the recognized text and its statistics
    #[arg(long)]
    show_text: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// Single-row CSV, one column per field
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        ExportFormat::from(self).extension()
    }
}

impl From<ExportFormat> for OutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Csv => Self::Csv,
            ExportFormat::Text => Self::Text,
        }
    }
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Text => Self::Text,
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let overrides = Overrides::parse_assignments(&args.set)?;
    let format = args.format.unwrap_or_else(|| config.export.format.into());

    info!("Processing file: {}", args.input.display());
    let (session, record) = process_file(&args.input, &config, &overrides)?;

    if args.show_text {
        let text = session.raw_text().unwrap_or_default();
        let stats = session.text_stats().unwrap_or_default();
        eprintln!("{}", style("Recognized text:").bold());
        eprintln!("{}", text);
        eprintln!(
            "{} {} characters, {} words, {} lines",
            style("ℹ").blue(),
            stats.characters,
            stats.words,
            stats.lines
        );
    }

    let output = format_record(&record, format, config.export.pretty_json)?;

    if let Some(output_path) = &args.output {
        let path = if output_path.is_dir() {
            let name = export_file_name(
                &config.export.filename_prefix,
                &record.timestamp,
                format.extension(),
            );
            output_path.join(name)
        } else {
            output_path.clone()
        };
        fs::write(&path, &output)?;
        println!("{} Output written to {}", style("✓").green(), path.display());
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        if let Some(fields) = session.current_fields() {
            eprintln!("{} {}", style("ℹ").blue(), confidence_line(fields));
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Run one document through text extraction, field extraction, review and
/// export.
pub fn process_file(
    path: &Path,
    config: &DocfieldsConfig,
    overrides: &Overrides,
) -> anyhow::Result<(DocumentSession, ExportRecord)> {
    let text = load_text(path, config)?;
    if text.trim().is_empty() {
        warn!("No text recognized in {}", path.display());
    }

    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut session = DocumentSession::new(source);
    session.attach_text(text)?;
    session.extract_fields(FieldRuleSet::default_rules())?;
    session.review(overrides)?;
    let record = session.export(Local::now().into())?;

    Ok((session, record))
}

/// Recognized text for a document. Text files are taken as the output of an
/// upstream OCR step.
fn load_text(path: &Path, config: &DocfieldsConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if extension == "txt" {
        return Ok(fs::read_to_string(path)?);
    }

    match MediaKind::from_extension(&extension) {
        Some(MediaKind::Pdf) => {
            let data = fs::read(path)?;
            let extractor = PdfTextExtractor::new(config.pdf.clone());
            Ok(extractor.extract_text(&data, MediaKind::Pdf))
        }
        Some(MediaKind::RasterImage) => anyhow::bail!(
            "{} is a raster image. Run OCR on it first and pass the recognized text as a .txt file.",
            path.display()
        ),
        None => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

fn confidence_line(fields: &FieldMap) -> String {
    format!(
        "Completeness score: {} ({}), a heuristic, not a probability",
        docfields_core::score(fields),
        Completeness::of(fields)
    )
}

pub fn format_record(
    record: &ExportRecord,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(record.to_json(pretty)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExportRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(ExportRecord::csv_headers())?;
    wtr.write_record(record.csv_row())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExportRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.source_filename));
    output.push_str(&format!("Exported: {}\n", record.timestamp.to_rfc3339()));
    output.push('\n');
    output.push_str(&record.fields.to_string());
    output.push('\n');
    output.push_str(&format!(
        "Completeness: {} ({})\n",
        docfields_core::score(&record.fields),
        Completeness::of(&record.fields)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use docfields_core::FieldName;

    fn record() -> ExportRecord {
        let timestamp = DateTime::parse_from_rfc3339("2023-05-12T14:30:05+02:00").unwrap();
        let fields = FieldMap::from_pairs([
            (FieldName::LastName, "Dupont"),
            (FieldName::Address, "3 rue X\nParis"),
        ]);
        ExportRecord::new(timestamp, "scan.pdf", fields)
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&record()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("reference_number,last_name,first_name,date,amount,tax_id,address,phone,email")
        );
        assert!(csv.contains(",Dupont,"));
        assert!(csv.contains("\"3 rue X\nParis\""));
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&record());
        assert!(text.starts_with("Document: scan.pdf\n"));
        assert!(text.contains("Nom: Dupont"));
        assert!(text.contains("Email: Non trouvé"));
        assert!(text.contains("Completeness: 24% (2/9 champs)"));
    }

    #[test]
    fn test_confidence_line_counts_fields() {
        assert_eq!(
            confidence_line(&record().fields),
            "Completeness score: 24% (2/9 champs), a heuristic, not a probability"
        );
        assert!(confidence_line(&FieldMap::empty()).contains("0% (0/9 champs)"));
    }

    #[test]
    fn test_output_format_follows_config() {
        assert_eq!(OutputFormat::from(ExportFormat::Csv), OutputFormat::Csv);
        assert_eq!(OutputFormat::Text.extension(), "txt");
    }
}
