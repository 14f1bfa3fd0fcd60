//! Host-page binding.
//!
//! The host application owns real layout; viewers only need three things
//! from it: resolve a container by id, read the container's client size,
//! and hear about size changes. `HostDocument` and `Container` model
//! exactly that surface. How containers come to exist on the host page is
//! out of scope.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Result, ViewerError};

/// Callback invoked when a container's client size changes.
///
/// Receives the new width, the new height, and the notification time the
/// observer should debounce against.
pub type ResizeCallback = Arc<dyn Fn(f64, f64, Instant) + Send + Sync>;

struct ContainerState {
    id: String,
    width: f64,
    height: f64,
    /// Ids of viewer roots currently mounted in this container.
    mounted: Vec<Uuid>,
    /// Registered size observers, keyed by observation token.
    observers: Vec<(Uuid, ResizeCallback)>,
}

/// A slot in the host page a viewer renders into.
///
/// Cheaply cloneable shared handle.
#[derive(Clone)]
pub struct Container {
    inner: Arc<RwLock<ContainerState>>,
}

impl Container {
    /// Create a detached container with the given id and client size.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ContainerState {
                id: id.into(),
                width,
                height,
                mounted: Vec::new(),
                observers: Vec::new(),
            })),
        }
    }

    /// The container's id in the host document.
    pub fn id(&self) -> String {
        self.inner.read().id.clone()
    }

    /// Current client size as (width, height).
    pub fn client_size(&self) -> (f64, f64) {
        let state = self.inner.read();
        (state.width, state.height)
    }

    /// Update the client size, notifying observers with the given time.
    ///
    /// Observers are invoked after the container lock is released, so an
    /// observer may freely call back into the container or into viewer
    /// state.
    pub fn set_size_at(&self, width: f64, height: f64, now: Instant) {
        let observers: Vec<ResizeCallback> = {
            let mut state = self.inner.write();
            state.width = width;
            state.height = height;
            state.observers.iter().map(|(_, cb)| cb.clone()).collect()
        };
        for observer in observers {
            observer(width, height, now);
        }
    }

    /// Update the client size, stamping notifications with the current time.
    pub fn set_size(&self, width: f64, height: f64) {
        self.set_size_at(width, height, Instant::now());
    }

    /// Record a viewer root as mounted in this container.
    pub fn mount(&self, viewer: Uuid) {
        self.inner.write().mounted.push(viewer);
    }

    /// Remove a viewer root from this container. No-op if absent.
    pub fn unmount(&self, viewer: Uuid) {
        self.inner.write().mounted.retain(|id| *id != viewer);
    }

    /// Whether the given viewer root is mounted here.
    pub fn is_mounted(&self, viewer: Uuid) -> bool {
        self.inner.read().mounted.contains(&viewer)
    }

    /// Number of viewer roots mounted in this container.
    pub fn mounted_count(&self) -> usize {
        self.inner.read().mounted.len()
    }

    /// Begin observing size changes. Returns a disconnectable handle.
    pub fn observe<F>(&self, callback: F) -> ResizeObservation
    where
        F: Fn(f64, f64, Instant) + Send + Sync + 'static,
    {
        let token = Uuid::new_v4();
        self.inner
            .write()
            .observers
            .push((token, Arc::new(callback)));
        ResizeObservation {
            container: self.clone(),
            token,
            connected: true,
        }
    }

    fn remove_observer(&self, token: Uuid) {
        self.inner.write().observers.retain(|(t, _)| *t != token);
    }

    /// Number of connected size observers.
    pub fn observer_count(&self) -> usize {
        self.inner.read().observers.len()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("Container")
            .field("id", &state.id)
            .field("width", &state.width)
            .field("height", &state.height)
            .field("mounted", &state.mounted.len())
            .finish()
    }
}

/// Handle for an active resize observation.
#[derive(Debug)]
pub struct ResizeObservation {
    container: Container,
    token: Uuid,
    connected: bool,
}

impl ResizeObservation {
    /// Stop observing. Calling this more than once is a no-op.
    pub fn disconnect(&mut self) {
        if self.connected {
            self.container.remove_observer(self.token);
            self.connected = false;
        }
    }

    /// Whether the observation is still delivering notifications.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// How a caller names the container a viewer should render into.
#[derive(Debug, Clone)]
pub enum ContainerRef {
    /// A container handle the caller already holds.
    Element(Container),
    /// An id to resolve against the host document.
    Id(String),
}

impl From<Container> for ContainerRef {
    fn from(container: Container) -> Self {
        ContainerRef::Element(container)
    }
}

impl From<&str> for ContainerRef {
    fn from(id: &str) -> Self {
        ContainerRef::Id(id.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(id: String) -> Self {
        ContainerRef::Id(id)
    }
}

/// Registry of the containers the host page exposes to viewers.
#[derive(Default)]
pub struct HostDocument {
    containers: RwLock<HashMap<String, Container>>,
}

impl HostDocument {
    /// An empty host document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a container with the given id and client size.
    pub fn create_container(&self, id: &str, width: f64, height: f64) -> Container {
        let container = Container::new(id, width, height);
        self.containers
            .write()
            .insert(id.to_string(), container.clone());
        container
    }

    /// Look up a container by id.
    pub fn container(&self, id: &str) -> Option<Container> {
        self.containers.read().get(id).cloned()
    }

    /// Resolve a container reference, failing on unknown ids.
    pub fn resolve(&self, target: &ContainerRef) -> Result<Container> {
        match target {
            ContainerRef::Element(container) => Ok(container.clone()),
            ContainerRef::Id(id) => {
                self.container(id)
                    .ok_or_else(|| ViewerError::ContainerNotFound { id: id.clone() })
            }
        }
    }
}

impl std::fmt::Debug for HostDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostDocument")
            .field("containers", &self.containers.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_resolve_by_id() {
        let host = HostDocument::new();
        host.create_container("plot", 400.0, 300.0);

        let container = host.resolve(&"plot".into()).unwrap();
        assert_eq!(container.id(), "plot");
        assert_eq!(container.client_size(), (400.0, 300.0));
    }

    #[test]
    fn test_resolve_unknown_id_fails() {
        let host = HostDocument::new();
        let err = host.resolve(&"nope".into()).unwrap_err();
        assert_eq!(
            err,
            ViewerError::ContainerNotFound {
                id: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_element_reference() {
        let host = HostDocument::new();
        let container = Container::new("detached", 100.0, 100.0);
        let resolved = host.resolve(&container.clone().into()).unwrap();
        assert_eq!(resolved.id(), "detached");
    }

    #[test]
    fn test_mount_unmount() {
        let container = Container::new("c", 10.0, 10.0);
        let viewer = Uuid::new_v4();

        container.mount(viewer);
        assert!(container.is_mounted(viewer));
        assert_eq!(container.mounted_count(), 1);

        container.unmount(viewer);
        assert!(!container.is_mounted(viewer));
        // Unmounting again is a no-op.
        container.unmount(viewer);
        assert_eq!(container.mounted_count(), 0);
    }

    #[test]
    fn test_observers_notified_with_new_size() {
        let container = Container::new("c", 10.0, 10.0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let _obs = container.observe(move |w, h, _| seen_clone.lock().push((w, h)));
        container.set_size_at(20.0, 30.0, Instant::now());
        container.set_size_at(40.0, 50.0, Instant::now());

        assert_eq!(*seen.lock(), vec![(20.0, 30.0), (40.0, 50.0)]);
        assert_eq!(container.client_size(), (40.0, 50.0));
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let container = Container::new("c", 10.0, 10.0);
        let mut obs = container.observe(|_, _, _| {});
        assert_eq!(container.observer_count(), 1);

        obs.disconnect();
        assert!(!obs.is_connected());
        obs.disconnect();
        assert_eq!(container.observer_count(), 0);
    }

    #[test]
    fn test_observer_may_reenter_container() {
        // Notification happens outside the container lock, so an observer
        // reading the container back must not deadlock.
        let container = Container::new("c", 10.0, 10.0);
        let sizes = Arc::new(Mutex::new(Vec::new()));
        let sizes_clone = sizes.clone();
        let reentrant = container.clone();

        let _obs = container.observe(move |_, _, _| {
            sizes_clone.lock().push(reentrant.client_size());
        });
        container.set_size_at(25.0, 35.0, Instant::now());

        assert_eq!(*sizes.lock(), vec![(25.0, 35.0)]);
    }
}
