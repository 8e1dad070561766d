//! Decoupled signal/listener bus
//!
//! [`Signal`] is the one-to-many notification primitive the trace machinery
//! uses to announce item firings and state changes without coupling the core
//! to its observers (e.g. a debug overlay). Dispatch is synchronous and in
//! registration order; there is no buffering, so firing with zero listeners
//! is a silent no-op.
//!
//! Dispatch iterates a snapshot of the listener list taken at the start of
//! `fire`, so handlers may register or remove listeners mid-dispatch without
//! corrupting the iteration.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

/// Opaque token identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken {
    id: Uuid,
}

impl ListenerToken {
    fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// The identifier of this listener
    pub fn id(&self) -> Uuid {
        self.id
    }
}

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// A generic one-to-many signal with handle-based listener removal
pub struct Signal<T> {
    listeners: Mutex<Vec<(ListenerToken, Handler<T>)>>,
}

impl<T> Signal<T> {
    /// Creates a signal with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Registers a handler called every time this signal fires
    ///
    /// Returns a [`ListenerToken`] that can be used to unregister later.
    pub fn listen<F>(&self, handler: F) -> ListenerToken
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let token = ListenerToken::new();
        self.lock().push((token, Arc::new(handler)));
        token
    }

    /// Fires this signal, invoking all current handlers synchronously in
    /// registration order
    pub fn fire(&self, payload: &T) {
        // Snapshot first so handlers can mutate the listener list safely
        let snapshot: Vec<Handler<T>> = self
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(payload);
        }
    }

    /// Removes the given listener; unknown tokens are a no-op
    pub fn remove(&self, token: ListenerToken) {
        self.lock().retain(|(registered, _)| *registered != token);
    }

    /// Removes all listeners (only do this if you know no one else is listening)
    pub fn remove_all(&self) {
        self.lock().clear();
    }

    /// The number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(ListenerToken, Handler<T>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
