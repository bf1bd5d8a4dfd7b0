//! Scoped subscription handles

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Unsubscribes when dropped
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

/// Listener set whose entries are removed by dropping their `Subscription`.
pub struct Listeners<T> {
    inner: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    pub fn add(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut registry = lock(&self.inner);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.insert(id, Arc::new(listener));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).entries.remove(&id);
            }
        })
    }

    /// Call every listener. Listeners run outside the lock so they may
    /// subscribe or unsubscribe.
    pub fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = lock(&self.inner).entries.values().cloned().collect();
        for listener in listeners {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_dropping_subscription_stops_deliveries() {
        let listeners: Listeners<u32> = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = hits.clone();
        let subscription = listeners.add(move |v| {
            counter.fetch_add(*v as usize, Ordering::SeqCst);
        });

        listeners.notify(&2);
        drop(subscription);
        listeners.notify(&5);

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn test_independent_subscriptions() {
        let listeners: Listeners<()> = Listeners::new();
        let first = listeners.add(|_| {});
        let _second = listeners.add(|_| {});
        assert_eq!(listeners.len(), 2);
        drop(first);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let listeners: Listeners<()> = Listeners::new();
        let subscription = listeners.add(|_| {});
        drop(listeners);
        drop(subscription);
    }
}
