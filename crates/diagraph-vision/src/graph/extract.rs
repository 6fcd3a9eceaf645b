// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graph structure extraction — significant contours become nodes, the edge
// strategy decides how they connect.

use std::sync::Arc;

use diagraph_core::ClassifierConfig;
use diagraph_core::error::Result;
use tracing::{info, instrument, warn};

use super::edges::{EdgeInference, ProximityEdges};
use super::model::Graph;
use crate::contour::extract_significant_contours;
use crate::raster::{BinaryMask, ImageInput, Polarity, normalize};

/// Recovers an approximate node/edge structure from a figure.
#[derive(Debug, Clone)]
pub struct GraphStructureExtractor {
    config: ClassifierConfig,
    strategy: Arc<dyn EdgeInference>,
}

impl Default for GraphStructureExtractor {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl GraphStructureExtractor {
    /// Extractor using proximity edges with the configured divisor.
    pub fn new(config: ClassifierConfig) -> Self {
        let strategy = Arc::new(ProximityEdges::new(config.edge_distance_divisor));
        Self { config, strategy }
    }

    /// Replace the edge inference strategy. Node extraction is unaffected.
    pub fn with_strategy(mut self, strategy: Arc<dyn EdgeInference>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Extract the graph, or say why it could not be analysed. An invalid
    /// configuration is rejected before the image is looked at.
    #[instrument(skip_all)]
    pub fn try_extract<'a>(&self, input: impl Into<ImageInput<'a>>) -> Result<Graph> {
        self.config.validate()?;
        let raster = normalize(input)?;
        let mask = BinaryMask::from_raster(
            &raster,
            self.config.binarize_threshold,
            Polarity::InkForeground,
        );

        let mut graph = Graph::new();
        for contour in extract_significant_contours(&mask, self.config.min_contour_area) {
            graph.add_node_with(contour, self.config.centroid_precision);
        }

        let edges = self.strategy.infer_edges(graph.nodes(), raster.dimensions());
        for edge in edges {
            graph.add_edge(edge.source, edge.target, edge.weight)?;
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph structure extracted"
        );
        Ok(graph)
    }

    /// Extract the graph. Any failure yields an empty graph, which means
    /// "could not analyse", not "no structure".
    pub fn extract<'a>(&self, input: impl Into<ImageInput<'a>>) -> Graph {
        self.try_extract(input).unwrap_or_else(|err| {
            warn!(error = %err, "Graph extraction failed; returning empty graph");
            Graph::new()
        })
    }
}

/// [`GraphStructureExtractor::extract`] with the default thresholds.
pub fn extract_graph_structure<'a>(input: impl Into<ImageInput<'a>>) -> Graph {
    GraphStructureExtractor::default().extract(input)
}
