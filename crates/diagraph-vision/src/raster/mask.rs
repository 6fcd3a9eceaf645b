// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-threshold binarization.

use image::{GrayImage, Luma};
use tracing::debug;

use super::normalize::RasterImage;

/// Foreground value in a [`BinaryMask`].
pub const FOREGROUND: u8 = 255;
/// Background value in a [`BinaryMask`].
pub const BACKGROUND: u8 = 0;

/// Which side of the threshold becomes foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Dark pixels (`gray <= threshold`) are foreground. Used for analysis,
    /// where ink is the signal.
    InkForeground,
    /// Light pixels (`gray > threshold`) are foreground. Dark text on white,
    /// as OCR engines expect.
    PaperForeground,
}

/// A two-level raster: every pixel is [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    pixels: GrayImage,
}

impl BinaryMask {
    /// Threshold an 8-bit grayscale image.
    pub fn from_gray(gray: &GrayImage, threshold: u8, polarity: Polarity) -> Self {
        let pixels = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let ink = gray.get_pixel(x, y).0[0] <= threshold;
            let on = match polarity {
                Polarity::InkForeground => ink,
                Polarity::PaperForeground => !ink,
            };
            Luma([if on { FOREGROUND } else { BACKGROUND }])
        });
        Self { pixels }
    }

    /// Grayscale-convert and threshold a raster.
    pub fn from_raster(raster: &RasterImage, threshold: u8, polarity: Polarity) -> Self {
        let mask = Self::from_gray(&raster.to_gray(), threshold, polarity);
        debug!(
            threshold,
            ?polarity,
            foreground = mask.foreground_count(),
            "Raster binarized"
        );
        mask
    }

    /// Wrap a buffer that is already two-level. Any non-zero pixel counts as
    /// foreground.
    pub fn from_binary(pixels: GrayImage) -> Self {
        let pixels = GrayImage::from_fn(pixels.width(), pixels.height(), |x, y| {
            Luma([if pixels.get_pixel(x, y).0[0] > 0 {
                FOREGROUND
            } else {
                BACKGROUND
            }])
        });
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        self.pixels.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    /// Pixelwise OR of two masks of the same size.
    pub fn union(&self, other: &BinaryMask) -> Option<BinaryMask> {
        if self.pixels.dimensions() != other.pixels.dimensions() {
            return None;
        }
        let pixels = GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([self.pixels.get_pixel(x, y).0[0].max(other.pixels.get_pixel(x, y).0[0])])
        });
        Some(Self { pixels })
    }

    /// Borrow the 0/255 buffer.
    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn into_gray(self) -> GrayImage {
        self.pixels
    }
}
