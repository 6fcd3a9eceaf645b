// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document pipeline — runs every extracted figure through the table and graph
// classifiers and collects table text plus the most detailed graph.

use diagraph_core::ClassifierConfig;
use diagraph_core::types::{ExtractedImage, PageText};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::graph::{Graph, GraphClassifier};
use crate::raster::RasterImage;
use crate::scan::{TextRecognizer, ocr_table};
use crate::table::TableDetector;

/// What a single figure turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Table,
    Graph,
    Other,
    Undecodable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageClassification {
    pub index: usize,
    pub page_index: u32,
    pub kind: FigureKind,
}

/// Recognized text of one table figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableText {
    pub page_index: u32,
    pub text: String,
}

/// The graph with the most nodes seen so far, and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct GraphCandidate {
    pub index: usize,
    pub page_index: u32,
    pub graph: Graph,
}

/// An image that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub index: usize,
    pub page_index: u32,
    pub reason: String,
}

/// A whole input that could not be read, so none of its figures were seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedSource {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentReport {
    /// Plain text of the source pages, when the source carries any.
    pub text: Vec<PageText>,
    pub classifications: Vec<ImageClassification>,
    pub tables: Vec<TableText>,
    pub graph: Option<GraphCandidate>,
    pub skipped: Vec<SkippedImage>,
    pub failed_sources: Vec<FailedSource>,
}

impl DocumentReport {
    /// Page texts in order, one per line break.
    pub fn document_text(&self) -> String {
        self.text
            .iter()
            .map(|page| page.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All table text, each block headed by its 1-based page number.
    pub fn combined_table_text(&self) -> String {
        self.tables
            .iter()
            .map(|table| {
                format!(
                    "[Table from page {}]:\n{}\n",
                    table.page_index + 1,
                    table.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of images classified as `kind`.
    pub fn count(&self, kind: FigureKind) -> usize {
        self.classifications
            .iter()
            .filter(|c| c.kind == kind)
            .count()
    }
}

/// Classifies a batch of figures and gathers their results.
///
/// Tables are checked first; only figures that are not tables are checked for
/// graph structure. Undecodable images are recorded and skipped.
pub struct DocumentAnalyzer<'r> {
    tables: TableDetector,
    graphs: GraphClassifier,
    recognizer: Option<&'r dyn TextRecognizer>,
}

impl Default for DocumentAnalyzer<'_> {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl<'r> DocumentAnalyzer<'r> {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            tables: TableDetector::new(config.clone()),
            graphs: GraphClassifier::new(config),
            recognizer: None,
        }
    }

    /// Attach a recognizer for table text. Without one, tables are still
    /// classified but no text is collected.
    pub fn with_recognizer<'a>(
        self,
        recognizer: &'a dyn TextRecognizer,
    ) -> DocumentAnalyzer<'a> {
        DocumentAnalyzer {
            tables: self.tables,
            graphs: self.graphs,
            recognizer: Some(recognizer),
        }
    }

    #[instrument(skip_all, fields(images = images.len()))]
    pub fn analyze(&self, images: &[ExtractedImage]) -> DocumentReport {
        let mut report = DocumentReport::default();

        for image in images {
            let kind = match RasterImage::from_bytes(&image.data) {
                Ok(raster) => self.analyze_figure(image, &raster, &mut report),
                Err(err) => {
                    warn!(
                        index = image.index,
                        page = image.page_index + 1,
                        error = %err,
                        "Skipping undecodable image"
                    );
                    report.skipped.push(SkippedImage {
                        index: image.index,
                        page_index: image.page_index,
                        reason: err.to_string(),
                    });
                    FigureKind::Undecodable
                }
            };
            report.classifications.push(ImageClassification {
                index: image.index,
                page_index: image.page_index,
                kind,
            });
        }

        info!(
            images = images.len(),
            tables = report.count(FigureKind::Table),
            graphs = report.count(FigureKind::Graph),
            skipped = report.skipped.len(),
            best_graph_nodes = report.graph.as_ref().map_or(0, |g| g.graph.node_count()),
            "Document analysed"
        );
        report
    }

    fn analyze_figure(
        &self,
        image: &ExtractedImage,
        raster: &RasterImage,
        report: &mut DocumentReport,
    ) -> FigureKind {
        if self.tables.detect_table(raster) {
            self.collect_table_text(image, raster, report);
            return FigureKind::Table;
        }

        if let Some(graph) = self.graph_of(raster) {
            let best = report.graph.as_ref().map_or(0, |g| g.graph.node_count());
            if graph.node_count() > best {
                debug!(
                    index = image.index,
                    nodes = graph.node_count(),
                    previous = best,
                    "New best graph"
                );
                report.graph = Some(GraphCandidate {
                    index: image.index,
                    page_index: image.page_index,
                    graph,
                });
            }
            return FigureKind::Graph;
        }

        FigureKind::Other
    }

    /// The recovered graph, if the figure classifies as one.
    fn graph_of(&self, raster: &RasterImage) -> Option<Graph> {
        match self.graphs.classify(raster) {
            Ok(verdict) if verdict.is_graph => Some(verdict.graph),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "Graph check failed; treating as not a graph");
                None
            }
        }
    }

    fn collect_table_text(
        &self,
        image: &ExtractedImage,
        raster: &RasterImage,
        report: &mut DocumentReport,
    ) {
        let Some(recognizer) = self.recognizer else {
            debug!(index = image.index, "No recognizer attached; table text not read");
            return;
        };

        let threshold = self.tables.config().binarize_threshold;
        match ocr_table(recognizer, raster, threshold) {
            Ok(text) if !text.is_empty() => report.tables.push(TableText {
                page_index: image.page_index,
                text,
            }),
            Ok(_) => debug!(index = image.index, "Table OCR produced no text"),
            Err(err) => warn!(index = image.index, error = %err, "Table OCR failed"),
        }
    }
}
