// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary morphology with straight line structuring elements.
//
// Elements shorter than `MAX_MASK_LENGTH` run through `imageproc::morphology`.
// Longer ones, which its `Mask` cannot hold, fall back to a prefix-sum sweep
// along each line with the same semantics. Pixels outside the image are
// ignored by both erosion and dilation.

use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode, grayscale_open};
use tracing::debug;

use crate::raster::BinaryMask;
use crate::raster::mask::FOREGROUND;

/// Longest element `imageproc::morphology::Mask` accepts, plus one.
const MAX_MASK_LENGTH: u32 = 512;

/// Orientation of a line structuring element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// A `1 x length` row.
    Horizontal,
    /// A `length x 1` column.
    Vertical,
}

/// A straight line structuring element, anchored at `length / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineElement {
    axis: Axis,
    length: u32,
}

impl LineElement {
    /// `None` for a zero-length element, which has no anchor.
    pub fn new(axis: Axis, length: u32) -> Option<Self> {
        (length > 0).then_some(Self { axis, length })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    fn anchor(&self) -> u32 {
        self.length / 2
    }

    /// The element as an imageproc mask, if it is short enough to be one.
    fn to_mask(self) -> Option<Mask> {
        if self.length >= MAX_MASK_LENGTH {
            return None;
        }
        // anchor <= 255 here, so the narrowing is lossless.
        let anchor = self.anchor() as u8;
        let line = match self.axis {
            Axis::Horizontal => GrayImage::from_pixel(self.length, 1, Luma([FOREGROUND])),
            Axis::Vertical => GrayImage::from_pixel(1, self.length, Luma([FOREGROUND])),
        };
        Some(match self.axis {
            Axis::Horizontal => Mask::from_image(&line, anchor, 0),
            Axis::Vertical => Mask::from_image(&line, 0, anchor),
        })
    }
}

#[derive(Clone, Copy)]
enum Op {
    Erode,
    Dilate,
}

/// Keep a pixel only if every in-image pixel under the element is foreground.
pub fn erode(mask: &BinaryMask, element: LineElement) -> BinaryMask {
    match element.to_mask() {
        Some(kernel) => BinaryMask::from_binary(grayscale_erode(mask.as_gray(), &kernel)),
        None => sweep(mask, element, Op::Erode),
    }
}

/// Set a pixel if any in-image pixel under the element is foreground.
pub fn dilate(mask: &BinaryMask, element: LineElement) -> BinaryMask {
    match element.to_mask() {
        Some(kernel) => BinaryMask::from_binary(grayscale_dilate(mask.as_gray(), &kernel)),
        None => sweep(mask, element, Op::Dilate),
    }
}

/// Erosion followed by dilation with the same element.
///
/// Foreground runs along the element's axis shorter than `length` vanish
/// unless they touch the image border. An even-length element shifts the
/// surviving runs by one pixel.
pub fn open(mask: &BinaryMask, element: LineElement) -> BinaryMask {
    match element.to_mask() {
        Some(kernel) => BinaryMask::from_binary(grayscale_open(mask.as_gray(), &kernel)),
        None => {
            debug!(
                length = element.length(),
                "Line element too long for an imageproc mask; sweeping"
            );
            sweep(&sweep(mask, element, Op::Erode), element, Op::Dilate)
        }
    }
}

/// One pass of erosion or dilation along every line of the mask, counting
/// foreground under the element with a prefix sum.
fn sweep(mask: &BinaryMask, element: LineElement, op: Op) -> BinaryMask {
    let (width, height) = (mask.width(), mask.height());
    let (lines, span) = match element.axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let locate = |line: u32, pos: u32| match element.axis {
        Axis::Horizontal => (pos, line),
        Axis::Vertical => (line, pos),
    };

    let before = element.anchor() as i64;
    let after = element.length as i64 - 1 - before;
    let last = span as i64 - 1;

    let mut out = GrayImage::new(width, height);
    let mut prefix = vec![0u32; span as usize + 1];

    for line in 0..lines {
        for pos in 0..span {
            let (x, y) = locate(line, pos);
            prefix[pos as usize + 1] = prefix[pos as usize] + mask.is_foreground(x, y) as u32;
        }

        for pos in 0..span {
            let lo = (pos as i64 - before).max(0);
            let hi = (pos as i64 + after).min(last);
            let count = prefix[hi as usize + 1] - prefix[lo as usize];
            let set = match op {
                Op::Erode => count as i64 == hi - lo + 1,
                Op::Dilate => count > 0,
            };
            if set {
                let (x, y) = locate(line, pos);
                out.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }

    BinaryMask::from_binary(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> BinaryMask {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let pixels = GrayImage::from_fn(width, height, |x, y| {
            let on = rows[y as usize].as_bytes()[x as usize] == b'#';
            Luma([if on { 255 } else { 0 }])
        });
        BinaryMask::from_binary(pixels)
    }

    fn rows_of(mask: &BinaryMask) -> Vec<String> {
        (0..mask.height())
            .map(|y| {
                (0..mask.width())
                    .map(|x| if mask.is_foreground(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn zero_length_element_is_rejected() {
        assert!(LineElement::new(Axis::Horizontal, 0).is_none());
        assert!(LineElement::new(Axis::Vertical, 1).is_some());
    }

    #[test]
    fn horizontal_opening_keeps_only_long_runs() {
        let mask = mask_from_rows(&["##.####.#####", ".###.........", "#############"]);
        let element = LineElement::new(Axis::Horizontal, 5).unwrap();

        assert_eq!(
            rows_of(&open(&mask, element)),
            vec!["........#####", ".............", "#############"]
        );
    }

    #[test]
    fn vertical_opening_removes_horizontal_strokes() {
        let mask = mask_from_rows(&["#####.", "....#.", "....#.", "....#.", "######"]);
        let element = LineElement::new(Axis::Vertical, 5).unwrap();

        assert_eq!(
            rows_of(&open(&mask, element)),
            vec!["....#.", "....#.", "....#.", "....#.", "....#."]
        );
    }

    #[test]
    fn opening_is_idempotent() {
        let mask = mask_from_rows(&["#.###.######..#", "######..###.###"]);
        let element = LineElement::new(Axis::Horizontal, 3).unwrap();

        let once = open(&mask, element);
        let twice = open(&once, element);
        assert_eq!(once, twice);
    }

    #[test]
    fn unit_element_is_identity() {
        let mask = mask_from_rows(&["#.#..#", ".##.#."]);
        let element = LineElement::new(Axis::Vertical, 1).unwrap();
        assert_eq!(erode(&mask, element), mask);
        assert_eq!(dilate(&mask, element), mask);
    }

    #[test]
    fn pixels_outside_the_image_are_ignored() {
        let mask = mask_from_rows(&["###...."]);
        let element = LineElement::new(Axis::Horizontal, 3).unwrap();
        assert_eq!(rows_of(&erode(&mask, element)), vec!["##....."]);

        // A short run against the border survives an even-length opening.
        let mask = mask_from_rows(&["###........."]);
        let element = LineElement::new(Axis::Horizontal, 6).unwrap();
        assert_eq!(rows_of(&open(&mask, element)), vec!["####........"]);
    }

    #[test]
    fn sweep_agrees_with_imageproc_masks() {
        let mask = mask_from_rows(&[
            "##.#####..###.#",
            "#.###..########",
            "..#####.#.##...",
            "###############",
            "#..###.####..##",
        ]);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            for length in 1..=6 {
                let element = LineElement::new(axis, length).unwrap();
                let eroded = sweep(&mask, element, Op::Erode);
                let dilated = sweep(&mask, element, Op::Dilate);
                assert_eq!(eroded, erode(&mask, element), "{axis:?} erode {length}");
                assert_eq!(dilated, dilate(&mask, element), "{axis:?} dilate {length}");
                assert_eq!(
                    sweep(&eroded, element, Op::Dilate),
                    open(&mask, element),
                    "{axis:?} open {length}"
                );
            }
        }
    }

    #[test]
    fn long_elements_fall_back_to_the_sweep() {
        let pixels = GrayImage::from_fn(1200, 3, |x, y| {
            let on = match y {
                0 => x < 700,
                1 => (100..400).contains(&x),
                _ => x >= 550,
            };
            Luma([if on { 255 } else { 0 }])
        });
        let mask = BinaryMask::from_binary(pixels);
        let element = LineElement::new(Axis::Horizontal, 600).unwrap();
        assert!(element.to_mask().is_none());

        let opened = open(&mask, element);
        let row_count = |y: u32| (0..1200).filter(|&x| opened.is_foreground(x, y)).count();
        assert!(row_count(0) > 0);
        assert_eq!(row_count(1), 0);
        assert!(row_count(2) > 0);
    }
}
