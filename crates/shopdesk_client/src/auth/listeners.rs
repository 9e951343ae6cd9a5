//! Auth state-change listeners.

use crate::auth::session::Session;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Kind of auth state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    /// Emitted by `init` with whatever session exists at that point.
    InitialSession,
    /// A session was created by sign-in or sign-up.
    SignedIn,
    /// The session was cleared by sign-out or expiry.
    SignedOut,
}

impl fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthChangeEvent::InitialSession => "INITIAL_SESSION",
            AuthChangeEvent::SignedIn => "SIGNED_IN",
            AuthChangeEvent::SignedOut => "SIGNED_OUT",
        };
        f.write_str(name)
    }
}

type Listener = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

/// Registered listeners, keyed by subscription id.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    pub(crate) fn add<F>(self: &Arc<Self>, listener: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }

    pub(crate) fn clear(&self) {
        self.listeners.lock().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Calls every listener in registration order.
    ///
    /// The lock is released before any listener runs, so listeners may
    /// subscribe or unsubscribe from inside the callback.
    pub(crate) fn emit(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event, session);
        }
    }
}

/// Handle returned by `on_auth_state_change`.
///
/// The listener stays registered until [`Subscription::unsubscribe`] is
/// called or the handle is dropped. Use [`Subscription::detach`] to keep it
/// for the lifetime of the session manager.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Subscription id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes the listener.
    pub fn unsubscribe(self) {
        // Drop does the work.
    }

    /// Keeps the listener registered without holding the handle.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;

    #[test]
    fn emit_reaches_every_listener() {
        let registry = Arc::new(ListenerRegistry::default());
        let seen = Arc::new(PlMutex::new(Vec::new()));

        let a = {
            let seen = seen.clone();
            registry.add(move |event, _| seen.lock().push(("a", event)))
        };
        let b = {
            let seen = seen.clone();
            registry.add(move |event, _| seen.lock().push(("b", event)))
        };

        registry.emit(AuthChangeEvent::SignedIn, None);
        assert_eq!(
            *seen.lock(),
            vec![("a", AuthChangeEvent::SignedIn), ("b", AuthChangeEvent::SignedIn)]
        );
        drop((a, b));
    }

    #[test]
    fn unsubscribe_and_drop_remove_listener() {
        let registry = Arc::new(ListenerRegistry::default());
        let first = registry.add(|_, _| {});
        let second = registry.add(|_, _| {});
        assert_eq!(registry.len(), 2);

        first.unsubscribe();
        assert_eq!(registry.len(), 1);

        drop(second);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn detached_listener_stays() {
        let registry = Arc::new(ListenerRegistry::default());
        registry.add(|_, _| {}).detach();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn event_names() {
        assert_eq!(AuthChangeEvent::SignedOut.to_string(), "SIGNED_OUT");
    }
}
