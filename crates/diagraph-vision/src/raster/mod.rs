// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster module — decoding, grayscale conversion, and binarization.

pub mod mask;
pub mod normalize;

pub use mask::{BinaryMask, Polarity};
pub use normalize::{ImageInput, RasterImage, normalize};
