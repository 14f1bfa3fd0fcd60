//! Headless demo: two dot plots synchronized over one bus.
//!
//! Simulates the pointer dwelling on a gene in the left plot, shows the
//! highlight reaching the right plot, then resizes a container and
//! exports both widgets as standalone SVG.

use std::sync::Arc;
use std::time::{Duration, Instant};

use genviz::{
    init_logging, DocumentStyles, DotPlot, EventBus, FamilyColors, HostDocument, PlotData,
    StyleRule, StyleSheet, Viewer, ViewerConfig,
};

const LEFT_DATA: &str = r#"{
    "reference_name": "ref-chr1",
    "chromosome_name": "chr1",
    "genes": [
        {"name": "g1", "family": "f1", "x": 1200.0, "y": 900.0},
        {"name": "g2", "family": "f2", "x": 5400.0, "y": 4100.0},
        {"name": "g3", "x": 8800.0, "y": 9300.0}
    ]
}"#;

const RIGHT_DATA: &str = r#"{
    "reference_name": "ref-chr1",
    "chromosome_name": "chr4",
    "genes": [
        {"name": "g1", "family": "f1", "x": 300.0, "y": 2500.0},
        {"name": "g7", "family": "f1", "x": 6100.0, "y": 7000.0}
    ]
}"#;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let host = HostDocument::new();
    host.create_container("left", 400.0, 400.0);
    host.create_container("right", 400.0, 400.0);
    let bus = Arc::new(EventBus::new());

    let colors: FamilyColors = [("f1", "#1f77b4"), ("f2", "#ff7f0e")].into_iter().collect();

    let left_data: PlotData = serde_json::from_str(LEFT_DATA)?;
    let right_data: PlotData = serde_json::from_str(RIGHT_DATA)?;

    let config = ViewerConfig {
        auto_resize: true,
        gene_over: Box::new(|name| tracing::info!(gene = %name, "hover committed")),
        ..Default::default()
    };
    let mut left = DotPlot::new(&host, "left", left_data, colors.clone(), config, bus.clone())?;
    let mut right = DotPlot::new(
        &host,
        "right",
        right_data,
        colors,
        ViewerConfig::default(),
        bus.clone(),
    )?;

    // Dwell on g1 in the left plot past the hover delay.
    let t0 = Instant::now();
    left.pointer_enter("g1", t0);
    let after_dwell = t0 + Duration::from_millis(500);
    left.tick(after_dwell);
    right.tick(after_dwell);

    let active = right.base().with_scene(|scene| scene.active_genes());
    tracing::info!(?active, "right plot lit up from the left plot's hover");

    // Grow the left container; the redraw coalesces behind the resize
    // debounce.
    let container = host.container("left").ok_or_else(|| anyhow::anyhow!("left container vanished"))?;
    container.set_size_at(640.0, 480.0, after_dwell);
    left.tick(after_dwell + Duration::from_millis(250));
    tracing::info!(size = ?left.base().rendered_size(), "left plot redrawn");

    let mut styles = DocumentStyles::new();
    styles.add_sheet(StyleSheet::readable(
        "demo.css",
        vec![
            StyleRule::new(".genviz .gene circle").declare("stroke-width", "1px"),
            StyleRule::new(".genviz .axis").declare("font-size", "11px"),
        ],
    ));
    println!("{}", left.xml(&styles));
    println!("{}", right.xml(&styles));

    left.destroy();
    right.destroy();
    Ok(())
}
