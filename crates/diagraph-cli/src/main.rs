// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diagraph — Figure classification for documents
//
// Entry point. Initialises logging, parses the command line, and dispatches to
// the analyze / classify commands.

mod analyze_cmd;
mod classify_cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use diagraph_core::ClassifierConfig;

#[derive(Debug, Parser)]
#[command(name = "diagraph")]
#[command(about = "Diagraph: find tables and node-link graphs in document figures")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify every figure in PDFs and image files
    Analyze(AnalyzeArgs),
    /// Show table and graph verdicts for a single image
    Classify(ClassifyArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// PDF or image files
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// JSON file overriding classifier thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Include the PDF page text in the summary
    #[arg(long)]
    text: bool,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR")]
    ocr_models: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ClassifyArgs {
    /// Image file
    image: PathBuf,

    /// JSON file overriding classifier thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the verdicts as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => analyze_cmd::run(args),
        Commands::Classify(args) => classify_cmd::run(args),
    }
}

/// Thresholds from `path`, or the defaults.
fn load_config(path: Option<&Path>) -> Result<ClassifierConfig> {
    match path {
        Some(path) => ClassifierConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ClassifierConfig::default()),
    }
}
