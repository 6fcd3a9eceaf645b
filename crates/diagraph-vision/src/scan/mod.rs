// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition — the recognizer seam, table OCR preparation, and the
// optional ocrs-backed engine.

pub mod table_text;

#[cfg(feature = "ocr")]
pub mod ocr;

use diagraph_core::error::Result;
use image::DynamicImage;

pub use table_text::{ocr_table, prepare_for_ocr};

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrEngine};

/// Anything that can turn an image into text.
pub trait TextRecognizer {
    /// All text found in `image`, lines separated by `\n`.
    fn recognize_text(&self, image: &DynamicImage) -> Result<String>;
}
