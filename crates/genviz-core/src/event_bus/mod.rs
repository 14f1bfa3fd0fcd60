//! # Event Bus Module
//!
//! Publish/subscribe channel that decouples independently created viewers:
//! publishers emit highlight events without knowing who renders what, and
//! every subscriber resolves the targets against its own rendering.
//!
//! One bus instance is created per application context and injected into
//! each viewer at construction; there is deliberately no process-global
//! instance.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use genviz_core::event_bus::{EventBus, EventFilter, HighlightEvent, HighlightTarget};
//!
//! let bus = Arc::new(EventBus::new());
//!
//! let subscription = bus.subscribe_handle(EventFilter::All, |event| {
//!     println!("highlight: {}", event.description());
//! });
//!
//! bus.publish(&HighlightEvent::select(HighlightTarget::genes(["g1"])));
//!
//! subscription.unsubscribe();
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
