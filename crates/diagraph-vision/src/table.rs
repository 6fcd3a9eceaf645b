// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table detection — isolates long horizontal and vertical rules with line
// openings and counts what survives.

use diagraph_core::ClassifierConfig;
use diagraph_core::error::{DiagraphError, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::contour::extract_contours;
use crate::morphology::{self, Axis, LineElement};
use crate::raster::{BinaryMask, ImageInput, Polarity, RasterImage, normalize};

/// Outcome of a table check, with the numbers that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableVerdict {
    /// Length of the horizontal line element, in pixels.
    pub horizontal_kernel: u32,
    /// Length of the vertical line element, in pixels.
    pub vertical_kernel: u32,
    /// Outer connected components in the merged rule mask.
    pub line_components: usize,
    pub is_table: bool,
}

/// Decides whether a figure is a ruled table.
///
/// Text glyphs and blobs are shorter than the line elements and vanish under
/// the opening; rules and borders survive. A figure with more surviving
/// components than `table_line_threshold` is a table.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: ClassifierConfig,
}

impl TableDetector {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Run the table check and report why it decided what it did.
    ///
    /// Decoding failures come back as [`DiagraphError::Decode`]; a raster too
    /// small for the configured line elements is [`DiagraphError::Analysis`].
    /// An invalid configuration is [`DiagraphError::Config`].
    #[instrument(skip_all)]
    pub fn try_detect<'a>(&self, input: impl Into<ImageInput<'a>>) -> Result<TableVerdict> {
        self.config.validate()?;
        let raster = normalize(input)?;
        let (horizontal, vertical) = self.line_elements(&raster)?;
        let lines = self.rule_mask(&raster, horizontal, vertical)?;

        let line_components = extract_contours(&lines).len();
        let is_table = line_components > self.config.table_line_threshold;

        info!(
            line_components,
            threshold = self.config.table_line_threshold,
            is_table,
            "Table check complete"
        );
        Ok(TableVerdict {
            horizontal_kernel: horizontal.length(),
            vertical_kernel: vertical.length(),
            line_components,
            is_table,
        })
    }

    /// `true` if the figure is a table. Any failure reads as "not a table".
    pub fn detect_table<'a>(&self, input: impl Into<ImageInput<'a>>) -> bool {
        match self.try_detect(input) {
            Ok(verdict) => verdict.is_table,
            Err(err) => {
                warn!(error = %err, "Table check failed; treating as not a table");
                false
            }
        }
    }

    fn line_elements(&self, raster: &RasterImage) -> Result<(LineElement, LineElement)> {
        let divisor = self.config.table_kernel_divisor;
        let (width, height) = raster.dimensions();

        let horizontal = LineElement::new(Axis::Horizontal, width / divisor).ok_or_else(|| {
            DiagraphError::Analysis(format!(
                "image width {} is too small for a horizontal line element (divisor {})",
                width, divisor
            ))
        })?;
        let vertical = LineElement::new(Axis::Vertical, height / divisor).ok_or_else(|| {
            DiagraphError::Analysis(format!(
                "image height {} is too small for a vertical line element (divisor {})",
                height, divisor
            ))
        })?;
        Ok((horizontal, vertical))
    }

    fn rule_mask(
        &self,
        raster: &RasterImage,
        horizontal: LineElement,
        vertical: LineElement,
    ) -> Result<BinaryMask> {
        let ink = BinaryMask::from_raster(
            raster,
            self.config.binarize_threshold,
            Polarity::InkForeground,
        );

        let rows = morphology::open(&ink, horizontal);
        let columns = morphology::open(&ink, vertical);
        debug!(
            horizontal_kernel = horizontal.length(),
            vertical_kernel = vertical.length(),
            horizontal_pixels = rows.foreground_count(),
            vertical_pixels = columns.foreground_count(),
            "Directional openings applied"
        );

        rows.union(&columns).ok_or_else(|| {
            DiagraphError::Analysis("directional masks differ in size".to_string())
        })
    }
}

/// [`TableDetector::detect_table`] with the default thresholds.
pub fn detect_table<'a>(input: impl Into<ImageInput<'a>>) -> bool {
    TableDetector::default().detect_table(input)
}
