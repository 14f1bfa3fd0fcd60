//! The dot-plot viewer.
//!
//! Renders a gene dataset as one circle per gene, positioned by the
//! gene's coordinates on the reference (x) and query (y) axes. Hovering
//! a circle publishes highlight events to the shared bus so every other
//! viewer on the page lights up the same gene; brushing a region zooms
//! the plot in place.

use std::sync::Arc;
use std::time::Instant;

use genviz_core::event_bus::{EventBus, HighlightEvent, HighlightTarget};
use genviz_viewer::base::{Viewer, ViewerBase};
use genviz_viewer::config::ViewerConfig;
use genviz_viewer::error::{Result, ViewerError};
use genviz_viewer::host::{ContainerRef, HostDocument};
use genviz_viewer::scene::{fmt_px, Element, Scene, FAMILY_ATTR, GENE_ATTR};

use crate::data::{FamilyColors, PlotBounds, PlotData};
use crate::scale::LinearScale;

const MARGIN_TOP: f64 = 20.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 30.0;
const MARGIN_LEFT: f64 = 30.0;

/// Radius of a gene circle, in pixels.
const GENE_RADIUS: f64 = 4.0;

/// Fill for genes drawn without a family color.
const UNCOLORED_FILL: &str = "#ffffff";

/// A finished brush gesture, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushRegion {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

/// A dot plot bound to one container.
pub struct DotPlot {
    base: ViewerBase,
    data: PlotData,
    colors: FamilyColors,
    x_scale: LinearScale,
    y_scale: LinearScale,
}

impl DotPlot {
    /// Validate the inputs, bind to the container, and draw.
    ///
    /// Fails with `MissingColors` when the color lookup is empty,
    /// `EmptyDataset` when there are no genes, and `ContainerNotFound`
    /// when `target` names an unknown container id.
    pub fn new(
        host: &HostDocument,
        target: impl Into<ContainerRef>,
        data: PlotData,
        colors: FamilyColors,
        config: ViewerConfig,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        if colors.is_empty() {
            return Err(ViewerError::MissingColors);
        }
        if data.genes.is_empty() {
            return Err(ViewerError::EmptyDataset);
        }

        let base = ViewerBase::new(host, target, config, bus)?;

        let bounds = PlotBounds::from_genes(&data.genes);
        let mut plot = Self {
            base,
            data,
            colors,
            // Ranges are set from the container size on the first draw.
            x_scale: LinearScale::new((bounds.min_x, bounds.max_x), (0.0, 0.0)),
            y_scale: LinearScale::new((bounds.min_y, bounds.max_y), (0.0, 0.0)),
        };
        plot.draw()?;
        plot.base.finish_init();
        Ok(plot)
    }

    /// The dataset being rendered.
    pub fn data(&self) -> &PlotData {
        &self.data
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// The pointer entered a gene circle. The highlight publishes after
    /// the hover delay.
    pub fn pointer_enter(&self, gene: &str, now: Instant) {
        if self.data.gene_index(gene).is_some() {
            self.base
                .begin_hover(HighlightEvent::select(HighlightTarget::genes([gene])), now);
        }
    }

    /// The pointer left a gene circle. The deselect publishes at once.
    pub fn pointer_leave(&self, gene: &str, now: Instant) {
        if self.data.gene_index(gene).is_some() {
            self.base.end_hover(
                HighlightEvent::deselect(HighlightTarget::genes([gene])),
                now,
            );
        }
    }

    /// A gene circle was clicked.
    pub fn click_gene(&self, gene: &str) {
        if let Some(index) = self.data.gene_index(gene) {
            (self.base.config().gene_click)(gene.to_string(), index);
        }
    }

    /// The plot background was clicked.
    pub fn click_plot(&self) {
        (self.base.config().plot_click)();
    }

    /// A brush gesture finished.
    ///
    /// `Some(region)` zooms the plot to the brushed pixel region: the
    /// scales' domains narrow to the region and every circle is
    /// repositioned in place, then `brush_up` runs with the names of the
    /// genes inside it. `None` (an empty brush) resets to the full
    /// dataset without running the callback.
    pub fn brush_end(&mut self, region: Option<BrushRegion>) {
        match region {
            Some(region) => {
                let x0 = self.x_scale.invert(region.x0);
                let x1 = self.x_scale.invert(region.x1);
                let y0 = self.y_scale.invert(region.y0);
                let y1 = self.y_scale.invert(region.y1);
                self.x_scale.set_domain((x0.min(x1), x0.max(x1)));
                self.y_scale.set_domain((y0.min(y1), y0.max(y1)));
                self.reposition();

                let (min_x, max_x) = self.x_scale.domain();
                let (min_y, max_y) = self.y_scale.domain();
                let zoomed = PlotBounds {
                    min_x,
                    max_x,
                    min_y,
                    max_y,
                };
                let brushed: Vec<String> = self
                    .data
                    .genes
                    .iter()
                    .filter(|g| zoomed.contains(g))
                    .map(|g| g.name.clone())
                    .collect();
                tracing::debug!(viewer = %self.base.id(), genes = brushed.len(), "brush zoom");
                (self.base.config().brush_up)(brushed);
            }
            None => {
                let bounds = PlotBounds::from_genes(&self.data.genes);
                self.x_scale.set_domain((bounds.min_x, bounds.max_x));
                self.y_scale.set_domain((bounds.min_y, bounds.max_y));
                self.reposition();
            }
        }
    }

    /// Move every gene circle to its position under the current scales
    /// without rebuilding the scene, so highlight state survives.
    fn reposition(&mut self) {
        let data = &self.data;
        let (x_scale, y_scale) = (self.x_scale, self.y_scale);
        self.base.with_scene_mut(|scene| {
            scene.root_mut().visit_mut(&mut |el| {
                let Some(name) = el.attr(GENE_ATTR).map(str::to_string) else {
                    return;
                };
                let Some(index) = data.gene_index(&name) else {
                    return;
                };
                let gene = &data.genes[index];
                let cx = fmt_px(x_scale.scale(gene.x));
                let cy = fmt_px(y_scale.scale(gene.y));
                for child in el.children_mut() {
                    if child.tag() == "circle" {
                        child.set_attr("cx", cx.clone());
                        child.set_attr("cy", cy.clone());
                    }
                }
            });
        });
    }

    fn fill_for(&self, family: &str) -> String {
        if family.is_empty() {
            return UNCOLORED_FILL.to_string();
        }
        if let Some(colored) = &self.base.config().selective_coloring {
            if !colored.contains(family) {
                return UNCOLORED_FILL.to_string();
            }
        }
        self.colors
            .color(family)
            .unwrap_or(UNCOLORED_FILL)
            .to_string()
    }

    /// Build the scene for the given container size. The plot is drawn
    /// square, sized to the smaller dimension; current zoom is kept.
    fn build_scene(&mut self, width: f64, height: f64) -> Scene {
        let dim = width.min(height);
        self.x_scale = LinearScale::new(self.x_scale.domain(), (MARGIN_LEFT, dim - MARGIN_RIGHT));
        self.y_scale = LinearScale::new(self.y_scale.domain(), (dim - MARGIN_BOTTOM, MARGIN_TOP));

        let mut scene = Scene::new(width, height);

        // Endpoint tick labels at the corners of the drawing area.
        let (x_min, x_max) = self.x_scale.domain();
        let (y_min, y_max) = self.y_scale.domain();
        let (rx0, rx1) = self.x_scale.range();
        let (ry0, ry1) = self.y_scale.range();
        for (value, x, y, anchor) in [
            (x_min, rx0, dim - 18.0, "start"),
            (x_max, rx1, dim - 18.0, "end"),
            (y_min, MARGIN_LEFT - 4.0, ry0, "end"),
            (y_max, MARGIN_LEFT - 4.0, ry1, "end"),
        ] {
            let mut tick = Element::new("text");
            tick.set_class("tick", true);
            tick.set_attr("x", fmt_px(x));
            tick.set_attr("y", fmt_px(y));
            tick.set_attr("text-anchor", anchor);
            tick.set_text(fmt_px(value));
            scene.root_mut().append(tick);
        }

        let mut x_label = Element::new("text");
        x_label.set_class("axis", true);
        x_label.set_attr("x", fmt_px(dim / 2.0));
        x_label.set_attr("y", fmt_px(dim - 4.0));
        x_label.set_attr("text-anchor", "middle");
        x_label.set_text(self.data.reference_name.clone());
        scene.root_mut().append(x_label);

        let mut y_label = Element::new("text");
        y_label.set_class("axis", true);
        y_label.set_attr(
            "transform",
            format!("translate(12, {}) rotate(-90)", fmt_px(dim / 2.0)),
        );
        y_label.set_attr("text-anchor", "middle");
        y_label.set_text(self.data.chromosome_name.clone());
        scene.root_mut().append(y_label);

        let genes = scene.root_mut().append(Element::new("g"));
        genes.set_class("genes", true);
        for gene in &self.data.genes {
            let mut group = Element::new("g");
            group.set_class("gene", true);
            group.set_attr(GENE_ATTR, gene.name.clone());
            group.set_attr(FAMILY_ATTR, gene.family.clone());

            let mut circle = Element::new("circle");
            circle.set_attr("cx", fmt_px(self.x_scale.scale(gene.x)));
            circle.set_attr("cy", fmt_px(self.y_scale.scale(gene.y)));
            circle.set_attr("r", fmt_px(GENE_RADIUS));
            circle.set_attr("fill", self.fill_for(&gene.family));
            circle.set_attr("stroke", "#000000");
            group.append(circle);

            genes.append(group);
        }

        scene
    }
}

impl Viewer for DotPlot {
    fn base(&self) -> &ViewerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewerBase {
        &mut self.base
    }

    fn draw(&mut self) -> Result<()> {
        if !self.base.is_alive() {
            return Err(ViewerError::Destroyed);
        }
        let (width, height) = self.base.rendered_size();
        let scene = self.build_scene(width, height);
        self.base.replace_scene(scene, width, height);
        tracing::debug!(viewer = %self.base.id(), genes = self.data.genes.len(), "dot plot drawn");
        Ok(())
    }

    fn on_resize(&mut self, width: f64, height: f64) -> Result<()> {
        let scene = self.build_scene(width, height);
        self.base.replace_scene(scene, width, height);
        Ok(())
    }
}

impl std::fmt::Debug for DotPlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DotPlot")
            .field("id", &self.base.id())
            .field("genes", &self.data.genes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlotGene;
    use genviz_core::types::thread_safe;
    use std::collections::HashSet;

    fn gene(name: &str, family: &str, x: f64, y: f64) -> PlotGene {
        PlotGene {
            name: name.to_string(),
            family: family.to_string(),
            x,
            y,
        }
    }

    fn demo_data() -> PlotData {
        PlotData {
            reference_name: "ref-chr1".to_string(),
            chromosome_name: "chr1".to_string(),
            genes: vec![
                gene("g1", "f1", 0.0, 0.0),
                gene("g2", "f2", 50.0, 100.0),
                gene("g3", "", 100.0, 200.0),
            ],
        }
    }

    fn demo_colors() -> FamilyColors {
        [("f1", "#1f77b4"), ("f2", "#ff7f0e")].into_iter().collect()
    }

    fn demo_host() -> HostDocument {
        let host = HostDocument::new();
        host.create_container("plot", 400.0, 400.0);
        host
    }

    fn demo_plot(config: ViewerConfig) -> (DotPlot, HostDocument) {
        let host = demo_host();
        let plot = DotPlot::new(
            &host,
            "plot",
            demo_data(),
            demo_colors(),
            config,
            Arc::new(EventBus::new()),
        )
        .unwrap();
        (plot, host)
    }

    #[test]
    fn test_missing_colors_rejected_before_empty_dataset() {
        let host = demo_host();
        let mut data = demo_data();
        data.genes.clear();

        let err = DotPlot::new(
            &host,
            "plot",
            data.clone(),
            FamilyColors::new(),
            ViewerConfig::default(),
            Arc::new(EventBus::new()),
        )
        .unwrap_err();
        assert_eq!(err, ViewerError::MissingColors);

        let err = DotPlot::new(
            &host,
            "plot",
            data,
            demo_colors(),
            ViewerConfig::default(),
            Arc::new(EventBus::new()),
        )
        .unwrap_err();
        assert_eq!(err, ViewerError::EmptyDataset);
    }

    #[test]
    fn test_unknown_container_rejected() {
        let host = demo_host();
        let err = DotPlot::new(
            &host,
            "nope",
            demo_data(),
            demo_colors(),
            ViewerConfig::default(),
            Arc::new(EventBus::new()),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ViewerError::ContainerNotFound {
                id: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_draw_renders_one_circle_per_gene() {
        let (plot, _host) = demo_plot(ViewerConfig::default());

        plot.base().with_scene(|scene| {
            let circles = scene.root().count_matching(|el| el.tag() == "circle");
            assert_eq!(circles, 3);
            let groups = scene.root().count_matching(|el| el.has_class("gene"));
            assert_eq!(groups, 3);
        });
    }

    #[test]
    fn test_circles_land_at_scaled_positions() {
        let (plot, _host) = demo_plot(ViewerConfig::default());

        // dim = 400: x range (30, 380), y range (370, 20).
        assert_eq!(plot.x_scale().scale(0.0), 30.0);
        assert_eq!(plot.x_scale().scale(100.0), 380.0);
        assert_eq!(plot.y_scale().scale(0.0), 370.0);

        let markup = plot.base().with_scene(|s| s.to_markup());
        assert!(markup.contains("cx=\"30\""));
        assert!(markup.contains("cy=\"370\""));
        assert!(markup.contains("cx=\"380\""));
    }

    #[test]
    fn test_fill_rules() {
        let (plot, _host) = demo_plot(ViewerConfig::default());
        assert_eq!(plot.fill_for("f1"), "#1f77b4");
        assert_eq!(plot.fill_for(""), "#ffffff");
        assert_eq!(plot.fill_for("unassigned-family"), "#ffffff");
    }

    #[test]
    fn test_selective_coloring_whitens_other_families() {
        let config = ViewerConfig {
            selective_coloring: Some(HashSet::from(["f1".to_string()])),
            ..Default::default()
        };
        let (plot, _host) = demo_plot(config);

        assert_eq!(plot.fill_for("f1"), "#1f77b4");
        assert_eq!(plot.fill_for("f2"), "#ffffff");
    }

    #[test]
    fn test_axis_labels() {
        let (plot, _host) = demo_plot(ViewerConfig::default());
        let markup = plot.base().with_scene(|s| s.to_markup());
        assert!(markup.contains(">ref-chr1</text>"));
        assert!(markup.contains(">chr1</text>"));
    }

    #[test]
    fn test_click_callbacks() {
        let clicks = thread_safe(Vec::new());
        let clicks_clone = clicks.clone();
        let plot_clicks = thread_safe(0usize);
        let plot_clicks_clone = plot_clicks.clone();
        let config = ViewerConfig {
            gene_click: Box::new(move |name, index| clicks_clone.lock().push((name, index))),
            plot_click: Box::new(move || *plot_clicks_clone.lock() += 1),
            ..Default::default()
        };
        let (plot, _host) = demo_plot(config);

        plot.click_gene("g2");
        plot.click_gene("unknown");
        plot.click_plot();

        assert_eq!(*clicks.lock(), vec![("g2".to_string(), 1)]);
        assert_eq!(*plot_clicks.lock(), 1);
    }

    #[test]
    fn test_brush_zooms_and_reports_genes_inside() {
        let brushed = thread_safe(Vec::new());
        let brushed_clone = brushed.clone();
        let config = ViewerConfig {
            brush_up: Box::new(move |names| brushed_clone.lock().push(names)),
            ..Default::default()
        };
        let (mut plot, _host) = demo_plot(config);

        // Pixel region covering data x in [0, 50], y in [0, 100]; g3 at
        // (100, 200) falls outside.
        let x1 = plot.x_scale().scale(50.0);
        let y0 = plot.y_scale().scale(100.0);
        plot.brush_end(Some(BrushRegion {
            x0: 30.0,
            x1,
            y0,
            y1: 370.0,
        }));

        assert_eq!(plot.x_scale().domain(), (0.0, 50.0));
        assert_eq!(plot.y_scale().domain(), (0.0, 100.0));
        assert_eq!(
            *brushed.lock(),
            vec![vec!["g1".to_string(), "g2".to_string()]]
        );

        // g2 now sits at the top-right of the zoomed plot.
        let markup = plot.base().with_scene(|s| s.to_markup());
        assert!(markup.contains("cx=\"380\""));
        assert!(markup.contains("cy=\"20\""));
    }

    #[test]
    fn test_empty_brush_resets_zoom() {
        let (mut plot, _host) = demo_plot(ViewerConfig::default());

        plot.brush_end(Some(BrushRegion {
            x0: 100.0,
            x1: 200.0,
            y0: 100.0,
            y1: 200.0,
        }));
        assert_ne!(plot.x_scale().domain(), (0.0, 100.0));

        plot.brush_end(None);
        assert_eq!(plot.x_scale().domain(), (0.0, 100.0));
        assert_eq!(plot.y_scale().domain(), (0.0, 200.0));
    }

    #[test]
    fn test_brush_preserves_highlight_state() {
        let (mut plot, _host) = demo_plot(ViewerConfig::default());
        plot.base()
            .bus()
            .publish(&HighlightEvent::select(HighlightTarget::genes(["g1"])));
        assert!(plot.base().with_scene(|s| s.any_active()));

        plot.brush_end(Some(BrushRegion {
            x0: 30.0,
            x1: 380.0,
            y0: 20.0,
            y1: 370.0,
        }));
        assert!(plot.base().with_scene(|s| s.any_active()));
    }

    #[test]
    fn test_draw_after_destroy_fails() {
        let (mut plot, _host) = demo_plot(ViewerConfig::default());
        plot.destroy();
        assert_eq!(plot.draw().unwrap_err(), ViewerError::Destroyed);
    }

    #[test]
    fn test_endpoint_tick_labels() {
        let (plot, _host) = demo_plot(ViewerConfig::default());
        let markup = plot.base().with_scene(|s| s.to_markup());
        // x domain (0, 100), y domain (0, 200).
        assert!(markup.contains(">100</text>"));
        assert!(markup.contains(">200</text>"));
    }

    #[test]
    fn test_redraw_on_resize_keeps_zoom() {
        let (mut plot, _host) = demo_plot(ViewerConfig::default());
        plot.brush_end(Some(BrushRegion {
            x0: 30.0,
            x1: 205.0,
            y0: 195.0,
            y1: 370.0,
        }));
        let zoomed = plot.x_scale().domain();

        plot.on_resize(800.0, 600.0).unwrap();
        assert_eq!(plot.x_scale().domain(), zoomed);
        // dim = 600 now.
        assert_eq!(plot.x_scale().range(), (30.0, 580.0));
        assert_eq!(plot.base().rendered_size(), (800.0, 600.0));
        assert_eq!(plot.base().with_scene(|s| s.width()), Some(800.0));
    }
}
