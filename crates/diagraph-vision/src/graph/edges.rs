// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge inference strategies.
//
// Nothing here sees drawn connector lines. Adjacency is inferred from where
// the node blobs sit, so dense clusters over-connect and long edges are
// missed.

use tracing::debug;

use super::model::{GraphEdge, GraphNode};

/// Decides which recovered nodes are connected.
pub trait EdgeInference: std::fmt::Debug + Send + Sync {
    /// Edges between `nodes`, for a figure of `dimensions` = `(width, height)`.
    fn infer_edges(&self, nodes: &[GraphNode], dimensions: (u32, u32)) -> Vec<GraphEdge>;
}

/// Connects every pair of nodes closer than `min(width, height) / divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEdges {
    divisor: f64,
}

impl ProximityEdges {
    pub fn new(divisor: f64) -> Self {
        Self { divisor }
    }

    /// Distance below which two nodes are adjacent.
    pub fn threshold(&self, (width, height): (u32, u32)) -> f64 {
        width.min(height) as f64 / self.divisor
    }
}

impl Default for ProximityEdges {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl EdgeInference for ProximityEdges {
    fn infer_edges(&self, nodes: &[GraphNode], dimensions: (u32, u32)) -> Vec<GraphEdge> {
        let threshold = self.threshold(dimensions);
        let mut edges = Vec::new();

        // All pairs; n is the number of blobs on one figure.
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                let distance = a.position.distance(&b.position);
                if distance < threshold {
                    edges.push(GraphEdge::new(a.id, b.id, distance));
                }
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            threshold,
            "Proximity edges inferred"
        );
        edges
    }
}
