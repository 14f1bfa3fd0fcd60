//! # Genviz
//!
//! Embeddable, synchronized genomic-visualization widgets.
//!
//! Viewers render gene datasets into host containers and publish
//! highlight events (select/deselect of genes or gene families) to a
//! shared [`EventBus`]. Every viewer subscribed to the bus resolves
//! incoming events against its own rendering, so hovering a gene in one
//! widget lights the same gene up in all of them.
//!
//! ## Architecture
//!
//! Genviz is organized as a workspace with multiple crates:
//!
//! 1. **genviz-core** - Event bus, highlight events, shared types
//! 2. **genviz-viewer** - Host binding, scene tree, viewer lifecycle
//! 3. **genviz-plot** - The dot-plot viewer
//! 4. **genviz** - Facade crate and demo binary
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use genviz::{
//!     DotPlot, EventBus, FamilyColors, HostDocument, PlotData, PlotGene,
//!     Viewer, ViewerConfig,
//! };
//!
//! let host = HostDocument::new();
//! host.create_container("plot", 400.0, 400.0);
//! let bus = Arc::new(EventBus::new());
//!
//! let data = PlotData {
//!     reference_name: "ref-chr1".to_string(),
//!     chromosome_name: "chr1".to_string(),
//!     genes: vec![PlotGene {
//!         name: "g1".to_string(),
//!         family: "f1".to_string(),
//!         x: 100.0,
//!         y: 250.0,
//!     }],
//! };
//! let colors: FamilyColors = [("f1", "#1f77b4")].into_iter().collect();
//!
//! let plot = DotPlot::new(&host, "plot", data, colors, ViewerConfig::default(), bus)?;
//! assert!(plot.base().is_alive());
//! # Ok::<(), genviz::ViewerError>(())
//! ```

pub use genviz_core::event_bus;
pub use genviz_core::types;
pub use genviz_plot as plot;
pub use genviz_viewer as viewer;

pub use genviz_core::{
    CoreError, EventBus, EventBusConfig, EventFilter, HighlightAction, HighlightEvent,
    HighlightTarget, Subscription, SubscriptionId,
};

pub use genviz_viewer::{
    Container, ContainerRef, DocumentStyles, HostDocument, LifecycleAction, Scene, StyleRule,
    StyleSheet, StyleSource, Viewer, ViewerBase, ViewerConfig, ViewerError,
};

pub use genviz_plot::{BrushRegion, DotPlot, FamilyColors, LinearScale, PlotData, PlotGene};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
