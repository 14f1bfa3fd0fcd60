//! # Genviz Core
//!
//! Event bus, highlight events, errors, and shared type aliases for the
//! genviz viewer crates. The bus is the only cross-viewer shared state:
//! viewers publish select/deselect events to it and resolve incoming events
//! against their own renderings.

pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{CoreError, Result};

pub use event_bus::{
    EventBus, EventBusConfig, EventFilter, HighlightAction, HighlightEvent, HighlightTarget,
    Subscription, SubscriptionId,
};

pub use types::{
    thread_safe, thread_safe_rw, Callback, DataCallback, DataCallback2, ThreadSafe, ThreadSafeRw,
};
