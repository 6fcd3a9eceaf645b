// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Table text — binarize a table figure for OCR and read it back.

use diagraph_core::error::Result;
use image::{DynamicImage, GrayImage};
use tracing::{debug, instrument};

use super::TextRecognizer;
use crate::raster::{BinaryMask, Polarity, RasterImage};

/// Grayscale and binarize `raster` as dark text on white paper.
pub fn prepare_for_ocr(raster: &RasterImage, threshold: u8) -> GrayImage {
    BinaryMask::from_raster(raster, threshold, Polarity::PaperForeground).into_gray()
}

/// Recognize the text of a table figure. The result is trimmed.
#[instrument(skip_all, fields(width = raster.width(), height = raster.height()))]
pub fn ocr_table(
    recognizer: &dyn TextRecognizer,
    raster: &RasterImage,
    threshold: u8,
) -> Result<String> {
    let binary = DynamicImage::ImageLuma8(prepare_for_ocr(raster, threshold));
    let text = recognizer.recognize_text(&binary)?;
    let text = text.trim().to_string();
    debug!(chars = text.len(), "Table text recognized");
    Ok(text)
}
