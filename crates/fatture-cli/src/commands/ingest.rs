//! Ingest command - feed PDF documents through the classification gate.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use fatture_core::{IngestOutcome, IngestStatus};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,
}

pub fn run(args: IngestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let (mut repo, _) = super::open(&config)?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching PDF files found");
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut added = 0usize;
    let mut skipped = 0usize;
    let mut errors = 0usize;

    for path in &files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf")
            .to_string();

        let outcome = fs::read(path)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| Ok(repo.ingest(&bytes, &filename)?));

        pb.suspend(|| match outcome {
            Ok(outcome) => {
                report_outcome(&filename, &outcome);
                match outcome {
                    IngestOutcome::Estimate { status: IngestStatus::Added, .. }
                    | IngestOutcome::PurchaseOrder { status: IngestStatus::Added, .. } => {
                        added += 1
                    }
                    _ => skipped += 1,
                }
            }
            Err(e) => {
                println!("{} {}: {}", style("✗").red(), filename, e);
                errors += 1;
            }
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    debug!("Ingest finished: {} added, {} skipped, {} errors", added, skipped, errors);

    println!();
    println!(
        "{} {} added, {} skipped, {} errors",
        style("ℹ").blue(),
        added,
        skipped,
        errors
    );

    Ok(())
}

fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = PathBuf::from(input);
        if path.is_file() {
            files.push(path);
            continue;
        }
        for entry in glob(input)? {
            files.push(entry?);
        }
    }

    files.retain(|p| {
        p.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    });

    Ok(files)
}

fn report_outcome(filename: &str, outcome: &IngestOutcome) {
    match outcome {
        IngestOutcome::Unrecognized => {
            println!("{} {}: not recognized", style("?").yellow(), filename);
        }
        IngestOutcome::Estimate { status, record } => report_status(
            filename,
            "estimate",
            record.pratica_hertz.as_deref().unwrap_or("-"),
            *status,
        ),
        IngestOutcome::PurchaseOrder { status, record } => report_status(
            filename,
            "purchase order",
            record.po_number.as_deref().unwrap_or("-"),
            *status,
        ),
    }
}

fn report_status(filename: &str, kind: &str, key: &str, status: IngestStatus) {
    match status {
        IngestStatus::Added => {
            println!("{} {}: {} {}", style("✓").green(), filename, kind, key);
        }
        IngestStatus::Duplicate => {
            println!(
                "{} {}: {} {} already pending",
                style("≡").yellow(),
                filename,
                kind,
                key
            );
        }
        IngestStatus::AlreadyInvoiced => {
            println!(
                "{} {}: {} {} already invoiced!",
                style("!").red(),
                filename,
                kind,
                key
            );
        }
    }
}
