// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `diagraph classify` — table and graph verdicts for one image.

use anyhow::{Context, Result};
use serde_json::json;

use diagraph_vision::graph::GraphVerdict;
use diagraph_vision::table::TableVerdict;
use diagraph_vision::{GraphClassifier, RasterImage, TableDetector};

use crate::{ClassifyArgs, load_config};

pub fn run(args: ClassifyArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let raster = RasterImage::open(&args.image)
        .with_context(|| format!("decoding {}", args.image.display()))?;

    let table = TableDetector::new(config.clone())
        .try_detect(&raster)
        .context("table check")?;
    let graph = GraphClassifier::new(config)
        .classify(&raster)
        .context("graph check")?;

    if args.json {
        let value = json!({
            "image": args.image.display().to_string(),
            "width": raster.width(),
            "height": raster.height(),
            "table": table,
            "graph": graph,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render(&table, &graph));
    }
    Ok(())
}

fn render(table: &TableVerdict, graph: &GraphVerdict) -> String {
    format!(
        "table: {} ({} line components, kernels {}x{})\n\
         graph: {} ({} nodes, {} edges)\n",
        yes_no(table.is_table),
        table.line_components,
        table.horizontal_kernel,
        table.vertical_kernel,
        yes_no(graph.is_graph),
        graph.graph.node_count(),
        graph.graph.edge_count(),
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
