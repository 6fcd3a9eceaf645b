// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic page builders shared by the unit tests.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;

use crate::raster::RasterImage;

const INK: Luma<u8> = Luma([0]);

/// A white grayscale page.
pub(crate) fn blank_page(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([255])))
}

/// Fill a `width x height` block of ink with its top-left corner at `(x, y)`.
pub(crate) fn draw_rect(page: &mut DynamicImage, x: i32, y: i32, width: u32, height: u32) {
    let canvas = page.as_mut_luma8().expect("test pages are grayscale");
    draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(width, height), INK);
}

/// Fill an ink disc.
pub(crate) fn draw_disc(page: &mut DynamicImage, cx: i32, cy: i32, radius: i32) {
    let canvas = page.as_mut_luma8().expect("test pages are grayscale");
    draw_filled_circle_mut(canvas, (cx, cy), radius, INK);
}

pub(crate) fn raster(page: DynamicImage) -> RasterImage {
    RasterImage::from_dynamic(page).expect("test pages are non-empty")
}

pub(crate) fn encode_png(page: &DynamicImage) -> Vec<u8> {
    let mut buffer = Vec::new();
    page.write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
        .expect("PNG encoding of a test page");
    buffer
}
