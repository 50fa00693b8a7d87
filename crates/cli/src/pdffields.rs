//! pdffields - Detect fill-in placeholders in PDF files
//!
//! A command line tool that scans contract PDFs for numbered fill-in
//! markers such as `(1)` sitting inside dotted or underscored blanks and
//! prints the resolved field rectangles as JSON.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use fieldmark_core::{DetectorParams, Placeholder, detect_placeholders};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Detect numbered fill-in placeholders in PDF files and print the
/// resolved field rectangles as JSON.
#[derive(Parser, Debug)]
#[command(name = "pdffields")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more paths to PDF files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Detection options ===
    /// Largest marker number accepted as a placeholder
    #[arg(long = "numeric-ceiling", default_value = "100")]
    numeric_ceiling: u32,

    /// Vertical distance within which fragments count as the same line
    #[arg(long = "line-tolerance", default_value = "10.0")]
    line_tolerance: f64,

    /// Horizontal distance around a marker searched for line context
    #[arg(long = "scan-range", default_value = "300.0")]
    scan_range: f64,

    /// Fragments examined after an opening parenthesis when reassembling
    /// a glyph-split marker
    #[arg(long = "lookahead-window", default_value = "10")]
    lookahead_window: usize,

    /// Filler characters required around a marker for it to qualify
    #[arg(long = "min-filler-count", default_value = "2")]
    min_filler_count: usize,

    /// Field height as a multiple of the marker font size
    #[arg(long = "line-height-factor", default_value = "1.2")]
    line_height_factor: f64,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

/// Detection result for one input file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file: String,
    placeholders: Vec<Placeholder>,
}

fn build_params(args: &Args) -> Result<DetectorParams> {
    DetectorParams::new(
        args.numeric_ceiling,
        args.line_tolerance,
        args.scan_range,
        args.lookahead_window,
        args.min_filler_count,
        args.line_height_factor,
    )
    .context("invalid detection parameters")
}

fn run(args: &Args) -> Result<()> {
    let params = build_params(args)?;

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let pdf_data = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let placeholders = detect_placeholders(&pdf_data, Some(params.clone()))
            .with_context(|| format!("failed to process {}", path.display()))?;
        reports.push(FileReport {
            file: path.display().to_string(),
            placeholders,
        });
    }

    let mut out: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &reports)?;
    } else {
        serde_json::to_writer(&mut out, &reports)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    run(&args)
}
