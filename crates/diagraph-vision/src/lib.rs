// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diagraph-vision — Figure analysis for Diagraph.
//
// Classifies document figures as ruled tables or node-link graphs, recovers
// an approximate graph structure, reads table text through a pluggable
// recognizer, and pulls embedded images out of PDFs.

pub mod contour;
pub mod graph;
pub mod morphology;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod scan;
pub mod table;

#[cfg(test)]
mod test_support;

// Re-export the primary entry points so callers can use `diagraph_vision::TableDetector` etc.
pub use graph::{
    Graph, GraphClassifier, GraphStructureExtractor, extract_graph_structure, is_graph,
};
pub use pdf::PdfImageExtractor;
pub use pipeline::{DocumentAnalyzer, DocumentReport, FigureKind};
pub use raster::{ImageInput, RasterImage};
pub use scan::TextRecognizer;
pub use table::{TableDetector, detect_table};

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
