// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Graph module — node/edge recovery from figures and the graph classifier.

pub mod classify;
pub mod edges;
pub mod extract;
pub mod model;

pub use classify::{GraphClassifier, GraphVerdict, is_graph};
pub use edges::{EdgeInference, ProximityEdges};
pub use extract::{GraphStructureExtractor, extract_graph_structure};
pub use model::{Graph, GraphEdge, GraphNode, NodeId, Position};
