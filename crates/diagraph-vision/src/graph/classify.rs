// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graph classification — a figure is a graph when its recovered structure has
// enough nodes and edges.

use diagraph_core::ClassifierConfig;
use diagraph_core::error::Result;
use serde::Serialize;
use tracing::{debug, warn};

use super::extract::GraphStructureExtractor;
use super::model::Graph;
use crate::raster::ImageInput;

/// The recovered structure together with the decision made from it.
#[derive(Debug, Clone, Serialize)]
pub struct GraphVerdict {
    pub graph: Graph,
    pub is_graph: bool,
}

/// Thresholds the extractor's output against the configured node and edge
/// counts.
#[derive(Debug, Clone, Default)]
pub struct GraphClassifier {
    extractor: GraphStructureExtractor,
}

impl GraphClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            extractor: GraphStructureExtractor::new(config),
        }
    }

    /// Classify with a custom extractor, e.g. one with a different edge
    /// strategy.
    pub fn with_extractor(extractor: GraphStructureExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &GraphStructureExtractor {
        &self.extractor
    }

    /// Whether `graph` clears both thresholds (strictly greater than).
    pub fn accepts(&self, graph: &Graph) -> bool {
        let config = self.extractor.config();
        graph.node_count() > config.graph_node_threshold
            && graph.edge_count() > config.graph_edge_threshold
    }

    /// Extract the structure and decide. Errors are the extractor's.
    pub fn classify<'a>(&self, input: impl Into<ImageInput<'a>>) -> Result<GraphVerdict> {
        let graph = self.extractor.try_extract(input)?;
        let is_graph = self.accepts(&graph);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            is_graph,
            "Graph check complete"
        );
        Ok(GraphVerdict { graph, is_graph })
    }

    /// `true` if the figure looks like a node-link diagram. Any failure reads
    /// as "not a graph".
    pub fn is_graph<'a>(&self, input: impl Into<ImageInput<'a>>) -> bool {
        match self.classify(input) {
            Ok(verdict) => verdict.is_graph,
            Err(err) => {
                warn!(error = %err, "Graph check failed; treating as not a graph");
                false
            }
        }
    }
}

/// [`GraphClassifier::is_graph`] with the default thresholds.
pub fn is_graph<'a>(input: impl Into<ImageInput<'a>>) -> bool {
    GraphClassifier::default().is_graph(input)
}
