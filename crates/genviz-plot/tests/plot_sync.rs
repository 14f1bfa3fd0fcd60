//! Two dot plots sharing one bus: highlights made in one viewer must
//! show up in every other viewer rendering the same genes or families.

use std::sync::Arc;
use std::time::{Duration, Instant};

use genviz_core::event_bus::{EventBus, HighlightEvent, HighlightTarget};
use genviz_plot::{DotPlot, FamilyColors, PlotData, PlotGene};
use genviz_viewer::base::Viewer;
use genviz_viewer::config::ViewerConfig;
use genviz_viewer::host::HostDocument;
use genviz_viewer::style::{DocumentStyles, StyleRule, StyleSheet};

fn gene(name: &str, family: &str, x: f64, y: f64) -> PlotGene {
    PlotGene {
        name: name.to_string(),
        family: family.to_string(),
        x,
        y,
    }
}

fn colors() -> FamilyColors {
    [("f1", "#1f77b4"), ("f2", "#ff7f0e")].into_iter().collect()
}

/// Two plots over different chromosomes that share genes g1/g2 and
/// family f1.
fn two_plots() -> (DotPlot, DotPlot, Arc<EventBus>, HostDocument) {
    let host = HostDocument::new();
    host.create_container("left", 400.0, 400.0);
    host.create_container("right", 400.0, 400.0);
    let bus = Arc::new(EventBus::new());

    let left = DotPlot::new(
        &host,
        "left",
        PlotData {
            reference_name: "ref-chr1".to_string(),
            chromosome_name: "chr1".to_string(),
            genes: vec![gene("g1", "f1", 0.0, 0.0), gene("g2", "f2", 100.0, 200.0)],
        },
        colors(),
        ViewerConfig::default(),
        bus.clone(),
    )
    .unwrap();

    let right = DotPlot::new(
        &host,
        "right",
        PlotData {
            reference_name: "ref-chr1".to_string(),
            chromosome_name: "chr2".to_string(),
            genes: vec![gene("g1", "f1", 10.0, 5.0), gene("g9", "f1", 90.0, 80.0)],
        },
        colors(),
        ViewerConfig::default(),
        bus.clone(),
    )
    .unwrap();

    (left, right, bus, host)
}

#[test]
fn hover_in_one_plot_highlights_the_other() {
    let (mut left, right, _bus, _host) = two_plots();

    let t0 = Instant::now();
    left.pointer_enter("g1", t0);

    // Before the hover delay nothing has published.
    left.tick(t0 + Duration::from_millis(400));
    assert!(right.base().with_scene(|s| !s.is_hovering()));

    left.tick(t0 + Duration::from_millis(500));
    for plot in [&left, &right] {
        plot.base().with_scene(|scene| {
            assert!(scene.is_hovering());
            assert_eq!(scene.active_genes(), vec!["g1".to_string()]);
        });
    }
}

#[test]
fn leaving_the_gene_clears_both_plots_immediately() {
    let (mut left, right, _bus, _host) = two_plots();

    let t0 = Instant::now();
    left.pointer_enter("g1", t0);
    left.tick(t0 + Duration::from_millis(500));
    assert!(right.base().with_scene(|s| s.any_active()));

    // No tick needed: deselect is not debounced.
    left.pointer_leave("g1", t0 + Duration::from_millis(800));
    for plot in [&left, &right] {
        plot.base().with_scene(|scene| {
            assert!(!scene.any_active());
            assert!(!scene.is_hovering());
        });
    }
}

#[test]
fn family_events_highlight_every_member() {
    let (left, right, bus, _host) = two_plots();

    bus.publish(&HighlightEvent::select(HighlightTarget::families(["f1"])));

    left.base().with_scene(|scene| {
        assert_eq!(scene.active_genes(), vec!["g1".to_string()]);
    });
    right.base().with_scene(|scene| {
        // Both of the right plot's genes are in f1.
        assert_eq!(
            scene.active_genes(),
            vec!["g1".to_string(), "g9".to_string()]
        );
    });
}

#[test]
fn destroyed_plot_stops_tracking_highlights() {
    let (mut left, mut right, bus, host) = two_plots();
    assert_eq!(bus.subscriber_count(), 2);

    right.destroy();
    assert_eq!(bus.subscriber_count(), 1);
    assert_eq!(host.container("right").unwrap().mounted_count(), 0);

    let t0 = Instant::now();
    left.pointer_enter("g1", t0);
    left.tick(t0 + Duration::from_millis(500));

    assert!(left.base().with_scene(|s| s.any_active()));
    assert!(right.base().with_scene(|s| !s.any_active()));

    // Destroying again changes nothing.
    right.destroy();
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn export_inlines_widget_styles() {
    let (left, _right, _bus, _host) = two_plots();

    let mut styles = DocumentStyles::new();
    styles.add_sheet(StyleSheet::readable(
        "page.css",
        vec![
            StyleRule::new(".genviz .gene circle").declare("stroke-width", "1px"),
            StyleRule::new("body").declare("margin", "0"),
        ],
    ));

    let markup = left.xml(&styles);
    assert!(markup.starts_with("<svg class=\"genviz\""));
    assert!(markup.contains("style=\"stroke-width: 1px;\""));
    // Unscoped page rules stay out of the export.
    assert!(!markup.contains("margin"));
    // Exporting again without state change yields identical output, and
    // inlining never touches the live scene.
    assert_eq!(left.xml(&styles), markup);

    // Export reflects live highlight state at the time of the call.
    left.base()
        .bus()
        .publish(&HighlightEvent::select(HighlightTarget::genes(["g1"])));
    let highlighted = left.xml(&styles);
    assert!(highlighted.contains("class=\"gene active\""));
}
