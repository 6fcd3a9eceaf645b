// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image normalization — turns encoded bytes or an already-decoded raster into
// the canonical `RasterImage` every analysis stage starts from.

use std::borrow::Cow;

use diagraph_core::error::{DiagraphError, Result};
use image::{DynamicImage, GrayImage, Luma};
use tracing::{debug, info, instrument};

/// A decoded, non-empty raster.
///
/// Immutable once constructed: analysis stages derive new buffers from it and
/// never write back.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// The decoded image. Width and height are both non-zero.
    image: DynamicImage,
}

impl RasterImage {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (PNG, JPEG, TIFF, ...). The format is sniffed
    /// from the content.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(DiagraphError::Decode("empty image buffer".to_string()));
        }
        let img = image::load_from_memory(data)
            .map_err(|err| DiagraphError::Decode(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Self::from_dynamic(img)
    }

    /// Load and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            DiagraphError::Decode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Self::from_dynamic(img)
    }

    /// Wrap an already-decoded `DynamicImage`, rejecting zero-sized rasters.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DiagraphError::Decode(format!(
                "decoded raster has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the raster and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Conversion -----------------------------------------------------------

    /// 8-bit grayscale copy of the raster.
    ///
    /// Colour is weighted with the BT.601 luma coefficients. Transparent
    /// pixels are then composited onto white so that a transparent background
    /// reads as paper, not ink.
    pub fn to_gray(&self) -> GrayImage {
        if let DynamicImage::ImageLuma8(gray) = &self.image {
            return gray.clone();
        }

        let rgba = self.image.to_rgba8();
        GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, alpha] = rgba.get_pixel(x, y).0;
            Luma([over_white(bt601_luma(r, g, b), alpha)])
        })
    }
}

/// `0.299 R + 0.587 G + 0.114 B` in 14-bit fixed point, rounded.
fn bt601_luma(r: u8, g: u8, b: u8) -> u8 {
    const R: u32 = 4899;
    const G: u32 = 9617;
    const B: u32 = 1868;
    let weighted = R * r as u32 + G * g as u32 + B * b as u32;
    ((weighted + (1 << 13)) >> 14) as u8
}

fn over_white(luma: u8, alpha: u8) -> u8 {
    let (luma, alpha) = (luma as u32, alpha as u32);
    ((luma * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

/// Input accepted by every analysis entry point.
#[derive(Debug, Clone, Copy)]
pub enum ImageInput<'a> {
    /// Compressed bytes still to be decoded.
    Encoded(&'a [u8]),
    /// A raster that was already decoded.
    Raster(&'a RasterImage),
}

impl<'a> From<&'a [u8]> for ImageInput<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::Encoded(data)
    }
}

impl<'a> From<&'a Vec<u8>> for ImageInput<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Self::Encoded(data.as_slice())
    }
}

impl<'a> From<&'a RasterImage> for ImageInput<'a> {
    fn from(raster: &'a RasterImage) -> Self {
        Self::Raster(raster)
    }
}

/// Bring any [`ImageInput`] to a decoded raster.
///
/// Already-decoded rasters pass through borrowed, so normalizing twice is a
/// no-op. Decoding failures surface as [`DiagraphError::Decode`]; an empty
/// raster is never returned in their place.
pub fn normalize<'a>(input: impl Into<ImageInput<'a>>) -> Result<Cow<'a, RasterImage>> {
    match input.into() {
        ImageInput::Raster(raster) => Ok(Cow::Borrowed(raster)),
        ImageInput::Encoded(data) => RasterImage::from_bytes(data).map(Cow::Owned),
    }
}
