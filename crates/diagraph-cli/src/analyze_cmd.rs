// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `diagraph analyze` — expand PDFs into their embedded images, classify every
// figure, and print the document report.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use diagraph_core::{ExtractedImage, ImageFormatTag, PageText};
use diagraph_vision::pipeline::FailedSource;
use diagraph_vision::scan::TextRecognizer;
use diagraph_vision::{DocumentAnalyzer, DocumentReport, PdfImageExtractor};

use crate::{AnalyzeArgs, load_config};

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let recognizer = load_recognizer(args.ocr_models.as_deref())?;
    let inputs = collect_inputs(&args.paths);
    info!(
        files = args.paths.len(),
        images = inputs.images.len(),
        failed = inputs.failures.len(),
        "Inputs collected"
    );

    let analyzer = DocumentAnalyzer::new(config);
    let mut report = match recognizer.as_deref() {
        Some(recognizer) => analyzer.with_recognizer(recognizer).analyze(&inputs.images),
        None => analyzer.analyze(&inputs.images),
    };
    report.text = inputs.text;
    report.failed_sources = inputs.failures;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&report, args.text));
    }
    Ok(())
}

#[cfg(feature = "ocr")]
fn load_recognizer(models: Option<&Path>) -> Result<Option<Box<dyn TextRecognizer>>> {
    use diagraph_vision::scan::OcrEngine;

    let Some(dir) = models else {
        return Ok(None);
    };
    let engine: Box<dyn TextRecognizer> = Box::new(
        OcrEngine::from_model_dir(dir)
            .with_context(|| format!("loading OCR models from {}", dir.display()))?,
    );
    Ok(Some(engine))
}

#[cfg(not(feature = "ocr"))]
fn load_recognizer(models: Option<&Path>) -> Result<Option<Box<dyn TextRecognizer>>> {
    match models {
        Some(_) => anyhow::bail!("--ocr-models needs a build with the `ocr` feature"),
        None => Ok(None),
    }
}

/// Everything read from the input files.
#[derive(Debug, Default)]
struct Inputs {
    images: Vec<ExtractedImage>,
    text: Vec<PageText>,
    failures: Vec<FailedSource>,
}

/// Every figure across `paths`. PDFs contribute their embedded images and
/// page text, other files are read as one image on page 1. Indices run across
/// the whole batch. A file that cannot be read is recorded and skipped.
fn collect_inputs(paths: &[PathBuf]) -> Inputs {
    let mut inputs = Inputs::default();

    for path in paths {
        if let Err(err) = read_input(path, &mut inputs) {
            warn!(path = %path.display(), error = %err, "Skipping unreadable input");
            inputs.failures.push(FailedSource {
                source: path.display().to_string(),
                reason: format!("{err:#}"),
            });
        }
    }

    inputs
}

fn read_input(path: &Path, inputs: &mut Inputs) -> Result<()> {
    if is_pdf(path) {
        let extractor =
            PdfImageExtractor::open(path).with_context(|| format!("reading {}", path.display()))?;
        inputs.text.extend(extractor.extract_text());
        for mut image in extractor.extract_images() {
            image.index = inputs.images.len();
            inputs.images.push(image);
        }
    } else {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        let format = ImageFormatTag::from_extension(extension);
        let index = inputs.images.len();
        inputs.images.push(ExtractedImage::new(data, format, 0, index));
    }
    Ok(())
}

fn render_summary(report: &DocumentReport, with_text: bool) -> String {
    let mut out = String::new();

    if with_text && !report.text.is_empty() {
        let _ = writeln!(out, "Text:\n{}\n", report.document_text().trim_end());
    }

    let _ = writeln!(out, "Figures: {}", report.classifications.len());
    for item in &report.classifications {
        let _ = writeln!(
            out,
            "  #{:<3} page {:<3} {:?}",
            item.index,
            item.page_index + 1,
            item.kind
        );
    }

    match &report.graph {
        Some(best) => {
            let _ = writeln!(
                out,
                "\nGraph: figure #{} on page {} ({} nodes, {} edges)",
                best.index,
                best.page_index + 1,
                best.graph.node_count(),
                best.graph.edge_count()
            );
            for edge in best.graph.edges() {
                let _ = writeln!(
                    out,
                    "  {} -- {}  ({:.1}px)",
                    edge.source, edge.target, edge.weight
                );
            }
        }
        None => {
            let _ = writeln!(out, "\nGraph: none found");
        }
    }

    if !report.tables.is_empty() {
        let _ = writeln!(out, "\n{}", report.combined_table_text());
    }

    if !report.failed_sources.is_empty() {
        let _ = writeln!(out, "\nUnreadable inputs: {}", report.failed_sources.len());
        for failed in &report.failed_sources {
            let _ = writeln!(out, "  {}: {}", failed.source, failed.reason);
        }
    }
    out
}

/// Paths that end in `.pdf`, any case.
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagraph_vision::pipeline::{FigureKind, ImageClassification, TableText};

    #[test]
    fn plain_files_become_single_images() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.PNG");
        let second = dir.path().join("b.jpeg");
        std::fs::write(&first, b"one").unwrap();
        std::fs::write(&second, b"two").unwrap();

        let inputs = collect_inputs(&[first, second]);
        let images = &inputs.images;
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].format, ImageFormatTag::Png);
        assert_eq!(images[1].format, ImageFormatTag::Jpeg);
        assert_eq!(images[1].index, 1);
        assert_eq!(images[1].data, b"two");
        assert!(images.iter().all(|image| image.page_index == 0));
        assert!(inputs.text.is_empty());
        assert!(inputs.failures.is_empty());
    }

    #[test]
    fn unreadable_files_are_recorded_and_the_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.png");
        let pdf = dir.path().join("broken.Pdf");
        std::fs::write(&pdf, b"%PDF-nope").unwrap();
        assert!(is_pdf(&pdf));
        let good = dir.path().join("figure.png");
        std::fs::write(&good, b"pixels").unwrap();

        let inputs = collect_inputs(&[missing.clone(), pdf.clone(), good]);
        assert_eq!(inputs.images.len(), 1);
        assert_eq!(inputs.images[0].index, 0);
        assert_eq!(inputs.images[0].data, b"pixels");

        let sources: Vec<&str> = inputs.failures.iter().map(|f| f.source.as_str()).collect();
        assert_eq!(
            sources,
            vec![missing.display().to_string(), pdf.display().to_string()]
        );
        assert!(inputs.failures.iter().all(|f| f.reason.starts_with("reading ")));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocr_models_need_the_feature() {
        assert!(load_recognizer(None).unwrap().is_none());
        assert!(load_recognizer(Some(Path::new("/models"))).is_err());
    }

    #[test]
    fn summary_lists_figures_and_tables() {
        let report = DocumentReport {
            classifications: vec![ImageClassification {
                index: 0,
                page_index: 1,
                kind: FigureKind::Table,
            }],
            tables: vec![TableText {
                page_index: 1,
                text: "x | y".into(),
            }],
            ..Default::default()
        };

        let summary = render_summary(&report, true);
        assert!(summary.starts_with("Figures: 1\n"));
        assert!(summary.contains("page 2"));
        assert!(summary.contains("Table"));
        assert!(summary.contains("Graph: none found"));
        assert!(summary.contains("[Table from page 2]:\nx | y\n"));
        assert!(!summary.contains("Unreadable"));
    }

    #[test]
    fn summary_shows_text_on_request_and_failed_inputs() {
        let report = DocumentReport {
            text: vec![PageText {
                page_index: 0,
                text: "Abstract\n".into(),
            }],
            failed_sources: vec![FailedSource {
                source: "scan.pdf".into(),
                reason: "reading scan.pdf".into(),
            }],
            ..Default::default()
        };

        let quiet = render_summary(&report, false);
        assert!(quiet.starts_with("Figures: 0\n"));
        assert!(quiet.contains("Unreadable inputs: 1\n  scan.pdf: reading scan.pdf\n"));

        let verbose = render_summary(&report, true);
        assert!(verbose.starts_with("Text:\nAbstract\n\nFigures: 0\n"));
    }
}
