//! # Genviz Viewer
//!
//! Shared viewer machinery: the host container model, the retained SVG
//! scene, debounce timers, stylesheet access, and the [`ViewerBase`] /
//! [`Viewer`] lifecycle that concrete viewers build on.
//!
//! A viewer binds to a container, draws a scene into it, and wires itself
//! to an event bus so highlights travel between viewers. The host drives
//! time by calling [`Viewer::tick`]; nothing here spawns threads or
//! sleeps.

pub mod base;
pub mod config;
pub mod debounce;
pub mod error;
pub mod host;
pub mod scene;
pub mod style;

pub use base::{LifecycleAction, Viewer, ViewerBase, UNFADE_DELAY};
pub use config::{ViewerConfig, DEFAULT_HOVER_DELAY, DEFAULT_RESIZE_DELAY};
pub use debounce::Debounce;
pub use error::{Result, ViewerError};
pub use host::{Container, ContainerRef, HostDocument, ResizeObservation};
pub use scene::{Element, Scene, Selector, WIDGET_CLASS};
pub use style::{inline_copy, DocumentStyles, StyleRule, StyleSheet, StyleSource};
