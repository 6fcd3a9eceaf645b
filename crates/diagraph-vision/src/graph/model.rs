// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graph value types — nodes recovered from contours, undirected weighted edges.

use std::collections::BTreeSet;

use diagraph_core::CentroidPrecision;
use diagraph_core::error::{DiagraphError, Result};
use serde::Serialize;

use crate::contour::Contour;

/// Identifier of a node, handed out by a counter in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A point in image coordinates (x to the right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A node-like blob found in the figure.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Area centroid of the originating contour.
    pub position: Position,
    /// The contour this node was built from.
    #[serde(skip)]
    pub contour: Contour,
}

impl GraphNode {
    /// A node placed at the centroid of `contour`.
    pub fn from_contour(id: NodeId, contour: Contour, precision: CentroidPrecision) -> Self {
        let (x, y) = contour.centroid();
        Self {
            id,
            position: Position::new(precision.apply(x), precision.apply(y)),
            contour,
        }
    }
}

/// An undirected edge. Endpoints are stored lowest id first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Euclidean distance between the endpoint centroids.
    pub weight: f64,
}

impl GraphEdge {
    pub fn new(a: NodeId, b: NodeId, weight: f64) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            source,
            target,
            weight,
        }
    }

    /// The unordered endpoint pair, lowest id first.
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    pub fn connects(&self, a: NodeId, b: NodeId) -> bool {
        self.key() == GraphEdge::new(a, b, 0.0).key()
    }
}

/// Nodes plus undirected edges.
///
/// Every edge joins two distinct nodes of this graph, and each unordered pair
/// carries at most one edge. An empty graph is also what the conservative
/// extraction path returns when analysis fails.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    edge_keys: BTreeSet<(NodeId, NodeId)>,
    #[serde(skip)]
    next_id: u32,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the exact centroid of `contour` and return its id.
    pub fn add_node(&mut self, contour: Contour) -> NodeId {
        self.add_node_with(contour, CentroidPrecision::Exact)
    }

    pub fn add_node_with(&mut self, contour: Contour, precision: CentroidPrecision) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(GraphNode::from_contour(id, contour, precision));
        id
    }

    /// Add an undirected edge. Returns `Ok(false)` if the pair is already
    /// connected (the existing weight is kept).
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> Result<bool> {
        if a == b {
            return Err(DiagraphError::Analysis(format!("self-loop on node {}", a)));
        }
        for id in [a, b] {
            if self.node(id).is_none() {
                return Err(DiagraphError::Analysis(format!(
                    "edge references unknown node {}",
                    id
                )));
            }
        }

        let edge = GraphEdge::new(a, b, weight);
        if !self.edge_keys.insert(edge.key()) {
            return Ok(false);
        }
        self.edges.push(edge);
        Ok(true)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes
            .binary_search_by_key(&id, |node| node.id)
            .ok()
            .map(|index| &self.nodes[index])
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_keys.contains(&GraphEdge::new(a, b, 0.0).key())
    }

    /// Weight of the edge between `a` and `b`, if any.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.edges
            .iter()
            .find(|edge| edge.connects(a, b))
            .map(|edge| edge.weight)
    }

    /// Number of edges touching `id`.
    pub fn degree(&self, id: NodeId) -> usize {
        self.edges
            .iter()
            .filter(|edge| edge.source == id || edge.target == id)
            .count()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
