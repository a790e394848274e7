/// Listener Registry
///
/// Ordered observer registry used by the store to broadcast every mutation.
/// Listeners are called synchronously in registration order. Each broadcast
/// runs over a snapshot of the registered handles, so a listener may
/// subscribe, unsubscribe or read the store while it is being notified.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Entry<T: ?Sized> {
    id: u64,
    listener: Listener<T>,
}

struct Slots<T: ?Sized>(RwLock<Vec<Entry<T>>>);

trait Detach: Send + Sync {
    fn detach(&self, id: u64) -> bool;
}

impl<T: ?Sized + 'static> Detach for Slots<T> {
    fn detach(&self, id: u64) -> bool {
        let mut entries = self.0.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

pub struct ListenerRegistry<T: ?Sized> {
    slots: Arc<Slots<T>>,
    next_id: AtomicU64,
}

impl<T: ?Sized + 'static> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self { slots: Arc::new(Slots(RwLock::new(Vec::new()))), next_id: AtomicU64::new(1) }
    }

    /// Register a listener. It stays registered until the returned
    /// `Subscription` is explicitly unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.slots.0.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(Entry { id, listener: Arc::new(listener) });

        tracing::debug!("Listener {} subscribed ({} registered)", id, entries.len());

        let slots: Arc<dyn Detach> = self.slots.clone();
        Subscription { id, slots: Arc::downgrade(&slots) }
    }

    /// Call every currently registered listener with `payload`
    pub fn notify(&self, payload: &T) {
        let listeners: Vec<Listener<T>> = {
            let entries = self.slots.0.read().unwrap_or_else(PoisonError::into_inner);
            entries.iter().map(|entry| entry.listener.clone()).collect()
        };

        for listener in &listeners {
            listener(payload);
        }

        tracing::trace!("Notified {} listener(s)", listeners.len());
    }

    pub fn len(&self) -> usize {
        self.slots.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + 'static> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`. Dropping it does not unsubscribe.
#[must_use = "keep the subscription to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    slots: Weak<dyn Detach>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove exactly this listener. Returns false if the registry is gone or
    /// the listener was already removed.
    pub fn unsubscribe(self) -> bool {
        match self.slots.upgrade() {
            Some(slots) => {
                let removed = slots.detach(self.id);
                tracing::debug!("Listener {} unsubscribed", self.id);
                removed
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_listeners_called_in_registration_order() {
        let registry = ListenerRegistry::<str>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        let _a = registry.subscribe(move |msg: &str| first.lock().unwrap().push(format!("a:{msg}")));
        let second = seen.clone();
        let _b = registry.subscribe(move |msg: &str| second.lock().unwrap().push(format!("b:{msg}")));

        registry.notify("ping");
        assert_eq!(*seen.lock().unwrap(), vec!["a:ping", "b:ping"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_listener() {
        let registry = ListenerRegistry::<u32>::new();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let a_hits = hits.clone();
        let a = registry.subscribe(move |n: &u32| a_hits.lock().unwrap().push(("a", *n)));
        let b_hits = hits.clone();
        let _b = registry.subscribe(move |n: &u32| b_hits.lock().unwrap().push(("b", *n)));

        registry.notify(&1);
        assert!(a.unsubscribe());
        registry.notify(&2);

        assert_eq!(*hits.lock().unwrap(), vec![("a", 1), ("b", 1), ("b", 2)]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_listener_can_subscribe_during_notify() {
        let registry = Arc::new(ListenerRegistry::<u32>::new());
        let inner = registry.clone();
        let _outer = registry.subscribe(move |_: &u32| {
            let _late = inner.subscribe(|_: &u32| {});
        });

        registry.notify(&1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let registry = ListenerRegistry::<u32>::new();
        let sub = registry.subscribe(|_: &u32| {});
        drop(registry);
        assert!(!sub.unsubscribe());
    }
}
