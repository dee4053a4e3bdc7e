//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use tracing::{error, warn};

use docfields_core::{
    ConfidenceScore, DocfieldsConfig, ExportRecord, FieldName, MediaKind, Overrides,
};

use super::extract::{format_record, process_file, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (one export file per document)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    record: Option<ExportRecord>,
    confidence: Option<ConfidenceScore>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;
    let format = args.format.unwrap_or_else(|| config.export.format.into());

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for path in glob(&args.input)?.filter_map(|r| r.ok()) {
        match input_kind(&path) {
            Some(InputKind::Text) => files.push(path),
            Some(InputKind::Raster) => skipped.push(path),
            None => {}
        }
    }

    for path in &skipped {
        println!(
            "{} Skipping {}: raster image, run OCR first and pass the text as .txt",
            style("⚠").yellow(),
            path.display()
        );
    }

    if files.is_empty() {
        anyhow::bail!("No processable files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Every document gets its own session; nothing is shared between them.
    let no_corrections = Overrides::new();
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let result = process_file(&path, &config, &no_corrections).and_then(|(session, record)| {
            if let Some(ref output_dir) = args.output_dir {
                write_record(&record, &path, output_dir, format, &config)?;
            }
            Ok((session, record))
        });

        match result {
            Ok((session, record)) => {
                outcomes.push(FileOutcome {
                    path,
                    confidence: session.confidence(),
                    record: Some(record),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    outcomes.push(FileOutcome {
                        path,
                        record: None,
                        confidence: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    for outcome in &outcomes {
        match (&outcome.confidence, &outcome.error) {
            (Some(score), _) => println!(
                "{} {} ({})",
                style("✓").green(),
                outcome.path.display(),
                score
            ),
            (None, Some(err)) => println!(
                "{} {}: {}",
                style("✗").red(),
                outcome.path.display(),
                err
            ),
            (None, None) => {}
        }
    }

    if args.summary {
        let summary = format_summary(&outcomes)?;
        match args.output_dir {
            Some(ref output_dir) => {
                let path = output_dir.join("summary.csv");
                fs::write(&path, summary)?;
                println!("{} Summary written to {}", style("✓").green(), path.display());
            }
            None => print!("{}", summary),
        }
    }

    let succeeded = outcomes.iter().filter(|o| o.record.is_some()).count();
    println!(
        "{} Processed {}/{} files in {:.1}s",
        style("ℹ").blue(),
        succeeded,
        outcomes.len(),
        start.elapsed().as_secs_f64()
    );
    if !skipped.is_empty() {
        println!("{} Skipped {} raster images", style("ℹ").blue(), skipped.len());
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    /// Recognized text or a PDF with a text layer.
    Text,
    /// Needs OCR before it can be processed.
    Raster,
}

fn input_kind(path: &Path) -> Option<InputKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext == "txt" {
        return Some(InputKind::Text);
    }
    match MediaKind::from_extension(&ext)? {
        MediaKind::Pdf => Some(InputKind::Text),
        MediaKind::RasterImage => Some(InputKind::Raster),
    }
}

fn write_record(
    record: &ExportRecord,
    source: &Path,
    output_dir: &Path,
    format: OutputFormat,
    config: &DocfieldsConfig,
) -> anyhow::Result<()> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.export.filename_prefix.clone());
    let path = output_dir.join(format!("{}.{}", stem, format.extension()));

    let output = format_record(record, format, config.export.pretty_json)?;
    fs::write(&path, output)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))?;
    Ok(())
}

fn format_summary(outcomes: &[FileOutcome]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["file", "confidence", "populated"];
    header.extend(FieldName::ALL.iter().map(|f| f.as_str()));
    header.push("error");
    wtr.write_record(&header)?;

    for outcome in outcomes {
        let mut row = vec![
            outcome.path.display().to_string(),
            outcome
                .confidence
                .map(|s| s.value().to_string())
                .unwrap_or_default(),
        ];

        match &outcome.record {
            Some(record) => {
                row.push(record.fields.populated_count().to_string());
                row.extend(record.csv_row().into_iter().map(str::to_string));
            }
            None => {
                row.push(String::new());
                row.extend(FieldName::ALL.iter().map(|_| String::new()));
            }
        }
        row.push(outcome.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}
