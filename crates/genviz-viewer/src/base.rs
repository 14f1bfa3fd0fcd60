//! Shared viewer lifecycle.
//!
//! `ViewerBase` owns everything a concrete viewer has in common: the
//! container binding, the bus subscription that resolves incoming
//! highlights against the scene, the hover and resize debounce timers,
//! and idempotent teardown. Concrete viewers hold a `ViewerBase` and
//! implement [`Viewer`] for drawing and resize handling.
//!
//! Timers never spawn or sleep. The host drives time by calling
//! [`Viewer::tick`] with the current instant; due timers surface as
//! [`LifecycleAction`]s which `tick` executes with no internal lock held,
//! so handlers and callbacks are free to call back into the viewer's bus.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use genviz_core::event_bus::{EventBus, EventFilter, HighlightEvent, HighlightTarget};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::debounce::Debounce;
use crate::error::Result;
use crate::host::{Container, ContainerRef, HostDocument, ResizeObservation};
use crate::scene::Scene;
use crate::style::{inline_copy, StyleSource};

/// Delay before a finished hover unfades the viewer, letting the pointer
/// travel between adjacent glyphs without flicker.
pub const UNFADE_DELAY: Duration = Duration::from_millis(125);

/// Work a due timer produced; executed by [`Viewer::tick`] after the
/// scene lock is released.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleAction {
    /// A hover dwelled past the hover delay; publish its select event.
    PublishHover(HighlightEvent),
    /// The container settled at a new size; redraw for it.
    Resize { width: f64, height: f64 },
}

/// State shared with the bus subscription and the resize observer.
struct SharedState {
    alive: bool,
    scene: Scene,
    rendered_size: (f64, f64),
    hover_arm: Debounce,
    pending_hover: Option<HighlightEvent>,
    hover_clear: Debounce,
    resize_arm: Debounce,
    pending_size: Option<(f64, f64)>,
}

/// Container binding, bus wiring, and timers common to every viewer.
pub struct ViewerBase {
    id: Uuid,
    bus: Arc<EventBus>,
    config: ViewerConfig,
    container: Option<Container>,
    shared: Arc<RwLock<SharedState>>,
    subscription: Option<genviz_core::event_bus::SubscriptionId>,
    observation: Option<ResizeObservation>,
}

impl ViewerBase {
    /// Bind to a container and subscribe to the bus.
    ///
    /// Fails with `ContainerNotFound` when `target` names an id the host
    /// does not know. The initial scene is empty, sized to the container;
    /// the concrete viewer draws into it and then calls [`finish_init`].
    ///
    /// [`finish_init`]: ViewerBase::finish_init
    pub fn new(
        host: &HostDocument,
        target: impl Into<ContainerRef>,
        config: ViewerConfig,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        let container = host.resolve(&target.into())?;
        let id = Uuid::new_v4();
        container.mount(id);

        let (width, height) = container.client_size();
        let shared = Arc::new(RwLock::new(SharedState {
            alive: true,
            scene: Scene::new(width, height),
            rendered_size: (width, height),
            hover_arm: Debounce::new(config.hover_delay),
            pending_hover: None,
            hover_clear: Debounce::new(UNFADE_DELAY),
            resize_arm: Debounce::new(config.resize_delay),
            pending_size: None,
        }));

        // The subscription resolves every bus event against this viewer's
        // scene, its own publishes included. Holding only a weak reference
        // keeps a leaked subscription from pinning the scene.
        let weak: Weak<RwLock<SharedState>> = Arc::downgrade(&shared);
        let subscription = bus.subscribe(EventFilter::All, move |event| {
            if let Some(shared) = weak.upgrade() {
                let mut state = shared.write();
                if state.alive {
                    state.scene.apply(event);
                }
            }
        });

        tracing::debug!(viewer = %id, container = %container.id(), "viewer bound");

        Ok(Self {
            id,
            bus,
            config,
            container: Some(container),
            shared,
            subscription: Some(subscription),
            observation: None,
        })
    }

    /// Complete initialization after the first draw: start the resize
    /// observation when configured and run the `on_init` callback.
    pub fn finish_init(&mut self) {
        if self.config.auto_resize {
            if let Some(container) = &self.container {
                let weak = Arc::downgrade(&self.shared);
                self.observation = Some(container.observe(move |width, height, now| {
                    if let Some(shared) = weak.upgrade() {
                        let mut state = shared.write();
                        if state.alive {
                            state.pending_size = Some((width, height));
                            state.resize_arm.arm(now);
                        }
                    }
                }));
            }
        }
        if let Some(on_init) = &self.config.on_init {
            on_init();
        }
    }

    /// The pointer settled over a highlightable feature. The select event
    /// publishes only if the pointer dwells past the hover delay; a new
    /// hover before then replaces the pending one.
    pub fn begin_hover(&self, event: HighlightEvent, now: Instant) {
        let mut state = self.shared.write();
        if !state.alive {
            return;
        }
        state.hover_clear.cancel();
        state.pending_hover = Some(event);
        state.hover_arm.arm(now);
    }

    /// The pointer left a highlightable feature. Any pending select is
    /// dropped, the deselect publishes immediately, and the unfade timer
    /// starts.
    pub fn end_hover(&self, event: HighlightEvent, now: Instant) {
        {
            let mut state = self.shared.write();
            if !state.alive {
                return;
            }
            state.hover_arm.cancel();
            state.pending_hover = None;
            state.hover_clear.arm(now);
        }
        // Published with the lock released: the bus dispatches back into
        // this viewer's own subscription.
        self.bus.publish(&event);
    }

    /// Poll the timers and return the work that came due.
    ///
    /// The unfade timer is handled here directly: past it, the viewer-wide
    /// hovering state clears unless some element is still actively
    /// highlighted (a hover elsewhere still targets this viewer).
    pub fn poll_actions(&self, now: Instant) -> Vec<LifecycleAction> {
        let mut actions = Vec::new();
        let mut state = self.shared.write();
        if !state.alive {
            return actions;
        }

        if state.hover_arm.poll(now) {
            if let Some(event) = state.pending_hover.take() {
                actions.push(LifecycleAction::PublishHover(event));
            }
        }

        if state.hover_clear.poll(now) && !state.scene.any_active() {
            state.scene.set_hovering(false);
        }

        if state.resize_arm.poll(now) {
            if let Some(size) = state.pending_size.take() {
                if size != state.rendered_size {
                    actions.push(LifecycleAction::Resize {
                        width: size.0,
                        height: size.1,
                    });
                }
            }
        }

        actions
    }

    /// Publish a committed hover and run the `gene_over` callback.
    pub fn publish_hover(&self, event: &HighlightEvent) {
        self.bus.publish(event);
        if let HighlightTarget::Genes(names) = &event.target {
            if let Some(name) = names.first() {
                (self.config.gene_over)(name.clone());
            }
        }
    }

    /// Tear the viewer down: unsubscribe from the bus, stop observing
    /// resizes, unmount from the container, and go inert. Safe to call
    /// any number of times.
    pub fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.bus.unsubscribe(subscription);
        }
        if let Some(mut observation) = self.observation.take() {
            observation.disconnect();
        }
        if let Some(container) = self.container.take() {
            container.unmount(self.id);
            tracing::debug!(viewer = %self.id, container = %container.id(), "viewer destroyed");
        }
        let mut state = self.shared.write();
        state.alive = false;
        state.hover_arm.cancel();
        state.hover_clear.cancel();
        state.resize_arm.cancel();
        state.pending_hover = None;
        state.pending_size = None;
    }

    /// Serialize the scene with widget-scoped styles inlined, so the
    /// markup renders standalone.
    pub fn xml(&self, styles: &dyn StyleSource) -> String {
        let state = self.shared.read();
        inline_copy(&state.scene, styles).to_markup()
    }

    /// Swap in a freshly drawn scene and record the size it was drawn at.
    pub fn replace_scene(&self, scene: Scene, width: f64, height: f64) {
        let mut state = self.shared.write();
        state.scene = scene;
        state.rendered_size = (width, height);
    }

    /// Read the scene.
    pub fn with_scene<R>(&self, f: impl FnOnce(&Scene) -> R) -> R {
        f(&self.shared.read().scene)
    }

    /// Mutate the scene in place.
    pub fn with_scene_mut<R>(&self, f: impl FnOnce(&mut Scene) -> R) -> R {
        f(&mut self.shared.write().scene)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The bound container, until destroyed.
    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// The size of the most recent draw.
    pub fn rendered_size(&self) -> (f64, f64) {
        self.shared.read().rendered_size
    }

    fn set_rendered_size(&self, width: f64, height: f64) {
        self.shared.write().rendered_size = (width, height);
    }

    pub fn is_alive(&self) -> bool {
        self.shared.read().alive
    }
}

impl std::fmt::Debug for ViewerBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerBase")
            .field("id", &self.id)
            .field("container", &self.container.as_ref().map(|c| c.id()))
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A concrete viewer: a `ViewerBase` plus drawing and resize handling.
pub trait Viewer {
    fn base(&self) -> &ViewerBase;

    fn base_mut(&mut self) -> &mut ViewerBase;

    /// Render the dataset into a fresh scene.
    fn draw(&mut self) -> Result<()>;

    /// The container settled at a new size; re-render for it.
    fn on_resize(&mut self, width: f64, height: f64) -> Result<()>;

    /// Advance the viewer's timers to `now` and execute whatever came
    /// due: commit dwelled hovers, redraw after settled resizes.
    fn tick(&mut self, now: Instant) {
        for action in self.base().poll_actions(now) {
            match action {
                LifecycleAction::PublishHover(event) => {
                    self.base().publish_hover(&event);
                }
                LifecycleAction::Resize { width, height } => match self.on_resize(width, height) {
                    Ok(()) => self.base().set_rendered_size(width, height),
                    Err(err) => {
                        tracing::warn!(viewer = %self.base().id(), error = %err, "redraw after resize failed");
                    }
                },
            }
        }
    }

    /// Tear the viewer down. Safe to call any number of times.
    fn destroy(&mut self) {
        self.base_mut().destroy();
    }

    /// Standalone markup of the current scene.
    fn xml(&self, styles: &dyn StyleSource) -> String {
        self.base().xml(styles)
    }

    fn id(&self) -> Uuid {
        self.base().id()
    }
}
