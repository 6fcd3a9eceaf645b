// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction — outer borders of connected foreground regions, with
// polygon moments for area and centroid.

use image::GrayImage;
use image::imageops::replace;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use tracing::debug;

use crate::raster::BinaryMask;

/// Default speckle filter: contours enclosing this much area or less are noise.
pub const DEFAULT_MIN_AREA: f64 = 100.0;

/// Boundary polygon of one connected foreground region.
///
/// Points are compressed: a straight run keeps only its two endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point<i32>>,
    moments: Moments,
}

/// Zeroth and first order area moments of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Green's theorem over the closed polygon. `m00` is the signed area:
    /// its sign follows the winding direction of the points.
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let n = points.len();
        if n < 3 {
            return Self::default();
        }

        let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            let (xi, yi, xj, yj) = (p.x as f64, p.y as f64, q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }

        Self {
            m00: a00 / 2.0,
            m10: a10 / 6.0,
            m01: a01 / 6.0,
        }
    }
}

impl Contour {
    /// Build a contour from a closed boundary, compressing straight runs.
    pub fn from_boundary(points: Vec<Point<i32>>) -> Self {
        let points = compress_straight_runs(points);
        let moments = Moments::of_polygon(&points);
        Self { points, moments }
    }

    /// Compressed boundary points, in traversal order.
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn moments(&self) -> Moments {
        self.moments
    }

    /// Enclosed area with its winding sign.
    pub fn signed_area(&self) -> f64 {
        self.moments.m00
    }

    /// Enclosed area, always non-negative.
    pub fn area(&self) -> f64 {
        self.moments.m00.abs()
    }

    /// `(M10 / M00, M01 / M00)`, or the origin for a contour that encloses
    /// nothing.
    pub fn centroid(&self) -> (f64, f64) {
        if self.moments.m00 == 0.0 {
            return (0.0, 0.0);
        }
        (
            self.moments.m10 / self.moments.m00,
            self.moments.m01 / self.moments.m00,
        )
    }
}

/// Every outermost contour of the mask, in raster discovery order
/// (top-to-bottom, then left-to-right by first boundary pixel).
///
/// Holes are not reported, and neither is anything drawn inside a hole.
/// Regions touching the image border are reported like any other.
pub fn extract_contours(mask: &BinaryMask) -> Vec<Contour> {
    // The border follower only starts an outer border after a background
    // pixel on the same row, so a region starting in column 0 would come
    // back as an orphan hole. Trace inside a one pixel background frame.
    let framed = with_background_frame(mask.as_gray());
    let contours: Vec<Contour> = find_contours::<i32>(&framed)
        .into_iter()
        .filter(|raw| raw.border_type == BorderType::Outer && raw.parent.is_none())
        .map(|raw| {
            let points = raw
                .points
                .into_iter()
                .map(|p| Point::new(p.x - 1, p.y - 1))
                .collect();
            Contour::from_boundary(points)
        })
        .collect();
    debug!(count = contours.len(), "Outer contours found");
    contours
}

/// Outer contours whose enclosed area exceeds `min_area`, order preserved.
pub fn extract_significant_contours(mask: &BinaryMask, min_area: f64) -> Vec<Contour> {
    let all = extract_contours(mask);
    let total = all.len();
    let significant: Vec<Contour> = all.into_iter().filter(|c| c.area() > min_area).collect();
    debug!(
        total,
        kept = significant.len(),
        min_area,
        "Contours filtered by area"
    );
    significant
}

/// `pixels` centred in a buffer one pixel larger on every side.
fn with_background_frame(pixels: &GrayImage) -> GrayImage {
    let mut framed = GrayImage::new(pixels.width() + 2, pixels.height() + 2);
    replace(&mut framed, pixels, 1, 1);
    framed
}

/// Drop repeated points and interior points of straight runs.
fn compress_straight_runs(points: Vec<Point<i32>>) -> Vec<Point<i32>> {
    let mut unique: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for p in points {
        if unique.last() != Some(&p) {
            unique.push(p);
        }
    }
    while unique.len() > 1 && unique.first() == unique.last() {
        unique.pop();
    }

    let n = unique.len();
    if n < 3 {
        return unique;
    }

    let step = |from: Point<i32>, to: Point<i32>| {
        ((to.x - from.x).signum(), (to.y - from.y).signum())
    };

    (0..n)
        .filter(|&i| {
            let prev = unique[(i + n - 1) % n];
            let here = unique[i];
            let next = unique[(i + 1) % n];
            step(prev, here) != step(here, next)
        })
        .map(|i| unique[i])
        .collect()
}
