// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classifier configuration.
//
// The defaults are the reference heuristics. None of them is calibrated
// against a labelled dataset, so every one is overridable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiagraphError, Result};

/// Tunable thresholds for figure classification and graph recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Intensity cutoff on the 8-bit grayscale scale. Pixels at or below it are ink.
    pub binarize_threshold: u8,
    /// Contours with an enclosed area at or below this are treated as speckle.
    pub min_contour_area: f64,
    /// Two nodes are adjacent when closer than `min(height, width) / divisor`.
    pub edge_distance_divisor: f64,
    /// Line structuring elements are `width / divisor` and `height / divisor` long.
    pub table_kernel_divisor: u32,
    /// A table needs strictly more line components than this.
    pub table_line_threshold: usize,
    /// A graph needs strictly more nodes than this.
    pub graph_node_threshold: usize,
    /// A graph needs strictly more edges than this.
    pub graph_edge_threshold: usize,
    /// Whether node positions keep the fractional centroid.
    pub centroid_precision: CentroidPrecision,
}

/// How a node's area centroid becomes its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CentroidPrecision {
    /// Keep the fractional centroid.
    #[default]
    Exact,
    /// Truncate each coordinate toward zero to a whole pixel.
    Truncated,
}

impl CentroidPrecision {
    pub fn apply(self, coordinate: f64) -> f64 {
        match self {
            Self::Exact => coordinate,
            Self::Truncated => coordinate.trunc(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            binarize_threshold: 150,
            min_contour_area: 100.0,
            edge_distance_divisor: 5.0,
            table_kernel_divisor: 30,
            table_line_threshold: 5,
            graph_node_threshold: 2,
            graph_edge_threshold: 1,
            centroid_precision: CentroidPrecision::Exact,
        }
    }
}

impl ClassifierConfig {
    /// Load overrides from a JSON file. Fields missing from the file keep
    /// their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the pipeline divide by zero or filter
    /// on a meaningless area.
    pub fn validate(&self) -> Result<()> {
        if !(self.edge_distance_divisor.is_finite() && self.edge_distance_divisor > 0.0) {
            return Err(DiagraphError::Config(format!(
                "edge_distance_divisor must be a positive number, got {}",
                self.edge_distance_divisor
            )));
        }
        if self.table_kernel_divisor == 0 {
            return Err(DiagraphError::Config(
                "table_kernel_divisor must be at least 1".to_string(),
            ));
        }
        if !(self.min_contour_area.is_finite() && self.min_contour_area >= 0.0) {
            return Err(DiagraphError::Config(format!(
                "min_contour_area must be a non-negative number, got {}",
                self.min_contour_area
            )));
        }
        Ok(())
    }
}
