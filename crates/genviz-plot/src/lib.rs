//! # Genviz Plot
//!
//! The dot-plot viewer: renders gene datasets as macro-synteny dot plots
//! and keeps highlights synchronized with every other viewer sharing the
//! same event bus.

pub mod data;
pub mod plot;
pub mod scale;

pub use data::{FamilyColors, PlotBounds, PlotData, PlotGene};
pub use plot::{BrushRegion, DotPlot};
pub use scale::LinearScale;
