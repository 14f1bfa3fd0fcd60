//! Event bus implementation.
//!
//! Provides the shared publish/subscribe channel that keeps independently
//! created viewers synchronized. One bus instance is constructed per
//! application context and injected into every viewer; there is no global
//! instance.

use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use super::events::{HighlightAction, HighlightEvent};

/// Subscription handle for unsubscribing from events.
///
/// Ids are handed out monotonically, so iterating the registry in key order
/// is the same as iterating in subscription order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Filter to receive only specific events.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these actions.
    Actions(Vec<HighlightAction>),
}

impl EventFilter {
    /// Check if an event matches this filter.
    pub fn matches(&self, event: &HighlightEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Actions(actions) => actions.contains(&event.action),
        }
    }
}

/// Type alias for event handler functions.
type EventHandler = Arc<dyn Fn(&HighlightEvent) + Send + Sync>;

struct HandlerEntry {
    filter: EventFilter,
    handler: EventHandler,
}

/// Configuration for the event bus.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
    /// How long to retain events in history.
    pub history_retention: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 1000,
            history_retention: Duration::from_secs(300),
        }
    }
}

/// Event with timestamp for history.
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: HighlightEvent,
    timestamp: Instant,
}

/// One-shot cancellation token returned by [`EventBus::subscribe_handle`].
///
/// Its only capability is unsubscribing the registration it stands for.
/// Cancelling more than once, or after the bus is gone, is a no-op.
pub struct Subscription {
    id: SubscriptionId,
    bus: Weak<EventBus>,
}

impl Subscription {
    /// The id this handle cancels.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the registration. Returns true the first time, false after.
    pub fn unsubscribe(&self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.unsubscribe(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Shared event bus for cross-viewer highlight distribution.
pub struct EventBus {
    /// Next subscription id to hand out.
    next_id: AtomicU64,
    /// Registered handlers, keyed by subscription id in insertion order.
    handlers: RwLock<BTreeMap<SubscriptionId, HandlerEntry>>,
    /// Event history (optional).
    history: RwLock<VecDeque<TimestampedEvent>>,
    /// Configuration.
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration.
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration.
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            handlers: RwLock::new(BTreeMap::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Subscribe to events with a synchronous handler.
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly to avoid holding up dispatch. Never fails.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&HighlightEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().insert(
            id,
            HandlerEntry {
                filter,
                handler: Arc::new(handler),
            },
        );
        tracing::debug!(subscription = %id, "subscription added");
        id
    }

    /// Subscribe and get back a one-shot cancellation handle bound to this bus.
    pub fn subscribe_handle<F>(self: &Arc<Self>, filter: EventFilter, handler: F) -> Subscription
    where
        F: Fn(&HighlightEvent) + Send + Sync + 'static,
    {
        Subscription {
            id: self.subscribe(filter, handler),
            bus: Arc::downgrade(self),
        }
    }

    /// Publish an event to all subscribers.
    ///
    /// Delivery is synchronous and in subscription order, to every handler
    /// registered when dispatch begins and not removed before its turn. A
    /// handler that panics is logged and skipped; it never blocks delivery
    /// to the remaining subscribers. Returns the number of handlers the
    /// event was delivered to.
    pub fn publish(&self, event: &HighlightEvent) -> usize {
        if self.config.enable_history {
            self.add_to_history(event);
        }

        // Snapshot the registry so handlers may subscribe/unsubscribe while
        // dispatch is in progress without corrupting iteration. No lock is
        // held while a handler runs.
        let snapshot: Vec<(SubscriptionId, EventFilter, EventHandler)> = self
            .handlers
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.filter.clone(), entry.handler.clone()))
            .collect();

        let mut delivered = 0;
        for (id, filter, handler) in snapshot {
            if !self.handlers.read().contains_key(&id) {
                // Removed mid-dispatch; skip.
                continue;
            }
            if !filter.matches(event) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    tracing::warn!(
                        subscription = %id,
                        event = %event.description(),
                        "subscriber panicked during dispatch; continuing with remaining subscribers"
                    );
                }
            }
        }
        delivered
    }

    /// Unsubscribe from events.
    ///
    /// Returns true if the subscription was found and removed. Calling it
    /// again for the same id is a no-op, not an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!(subscription = %id, "subscription removed");
        }
        removed
    }

    /// Whether the given subscription is currently registered.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.handlers.read().contains_key(&id)
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Get recent event history (if enabled).
    ///
    /// Returns events since the given instant, or all history if None.
    pub fn history(&self, since: Option<Instant>) -> Vec<HighlightEvent> {
        if !self.config.enable_history {
            return Vec::new();
        }

        let history = self.history.read();
        match since {
            Some(since) => history
                .iter()
                .filter(|e| e.timestamp >= since)
                .map(|e| e.event.clone())
                .collect(),
            None => history.iter().map(|e| e.event.clone()).collect(),
        }
    }

    /// Clear event history.
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration.
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    /// Add an event to history, maintaining size and age limits.
    fn add_to_history(&self, event: &HighlightEvent) {
        let mut history = self.history.write();
        let now = Instant::now();

        history.push_back(TimestampedEvent {
            event: event.clone(),
            timestamp: now,
        });

        let retention = self.config.history_retention;
        while history
            .front()
            .is_some_and(|e| now.duration_since(e.timestamp) > retention)
        {
            history.pop_front();
        }

        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}
