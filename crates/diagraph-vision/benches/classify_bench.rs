// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for figure classification in the diagraph-vision crate.
// Runs table detection and graph extraction on a synthetic 600x600 page.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, GrayImage, Luma};

use diagraph_vision::{GraphStructureExtractor, RasterImage, TableDetector};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// White page with a ruled grid in the top half and a ring of 8x8 blocks
/// ("nodes") in the bottom half.
fn synthetic_page() -> RasterImage {
    let (width, height) = (600u32, 600u32);
    let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));

    for row in 0..6 {
        let y = 20 + row * 50;
        for x in 20..580 {
            img.put_pixel(x, y, Luma([0u8]));
        }
    }
    for col in 0..8 {
        let x = 20 + col * 80;
        for y in 20..270 {
            img.put_pixel(x, y, Luma([0u8]));
        }
    }

    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        let cx = (300.0 + 200.0 * angle.cos()) as u32;
        let cy = (450.0 + 120.0 * angle.sin()) as u32;
        for y in cy.saturating_sub(8)..(cy + 8).min(height) {
            for x in cx.saturating_sub(8)..(cx + 8).min(width) {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
    }

    match RasterImage::from_dynamic(DynamicImage::ImageLuma8(img)) {
        Ok(raster) => raster,
        Err(err) => panic!("synthetic page is non-empty: {err}"),
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_table_detection(c: &mut Criterion) {
    let page = synthetic_page();
    let detector = TableDetector::default();

    c.bench_function("detect_table (600x600)", |b| {
        b.iter(|| black_box(detector.detect_table(black_box(&page))));
    });
}

fn bench_graph_extraction(c: &mut Criterion) {
    let page = synthetic_page();
    let extractor = GraphStructureExtractor::default();

    c.bench_function("extract_graph_structure (600x600)", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&page))));
    });
}

criterion_group!(benches, bench_table_detection, bench_graph_extraction);
criterion_main!(benches);
