//! Viewer configuration.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use genviz_core::types::{Callback, DataCallback, DataCallback2};

/// Default hover debounce: pointer dwell before a highlight publishes.
pub const DEFAULT_HOVER_DELAY: Duration = Duration::from_millis(500);

/// Default resize debounce: quiet period before a redraw.
pub const DEFAULT_RESIZE_DELAY: Duration = Duration::from_millis(250);

/// Options shared by every viewer. Interaction callbacks default to
/// no-ops so callers only wire the ones they care about.
pub struct ViewerConfig {
    /// Redraw when the container is resized.
    pub auto_resize: bool,
    /// Quiet period before a resize triggers a redraw.
    pub resize_delay: Duration,
    /// Pointer dwell before a hover publishes a highlight.
    pub hover_delay: Duration,
    /// When set, only these families are drawn in color.
    pub selective_coloring: Option<HashSet<String>>,
    /// A gene glyph was clicked: gene name and its index in the dataset.
    pub gene_click: DataCallback2<String, usize>,
    /// A gene hover committed (after the hover delay): gene name.
    pub gene_over: DataCallback<String>,
    /// The plot background was clicked.
    pub plot_click: Callback,
    /// A brush gesture finished: names of the brushed genes.
    pub brush_up: DataCallback<Vec<String>>,
    /// Runs once after the first draw completes.
    pub on_init: Option<Callback>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            auto_resize: false,
            resize_delay: DEFAULT_RESIZE_DELAY,
            hover_delay: DEFAULT_HOVER_DELAY,
            selective_coloring: None,
            gene_click: Box::new(|_, _| {}),
            gene_over: Box::new(|_| {}),
            plot_click: Box::new(|| {}),
            brush_up: Box::new(|_| {}),
            on_init: None,
        }
    }
}

impl fmt::Debug for ViewerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerConfig")
            .field("auto_resize", &self.auto_resize)
            .field("resize_delay", &self.resize_delay)
            .field("hover_delay", &self.hover_delay)
            .field("selective_coloring", &self.selective_coloring)
            .field("on_init", &self.on_init.is_some())
            .finish_non_exhaustive()
    }
}
