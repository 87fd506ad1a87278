//! Model change notifications and their subscription hub.
//!
//! A model owns a [`ModelEvents`] hub and emits [`ModelEvent`]s into it. Each
//! [`Subscription`] buffers the events it receives until its owner drains
//! them, so a notification raised while the owner is in the middle of a
//! mutation is applied afterwards instead of re-entering it. Dropping the
//! subscription unregisters it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use log::debug;

use super::path::TreePath;

/// A change reported by a tree model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent<K> {
    /// Display content of the node at `path` and its subtree changed; the
    /// shape did not. The root path means "many nodes".
    NodesChanged { path: TreePath<K> },
    /// `count` children were inserted under `parent`, starting at `start`.
    NodesInserted {
        parent: TreePath<K>,
        start: usize,
        count: usize,
    },
    /// `count` children were removed from `parent`, starting at `start`.
    NodesRemoved {
        parent: TreePath<K>,
        start: usize,
        count: usize,
    },
    /// The subtree below `path` must be considered replaced wholesale.
    StructureChanged { path: TreePath<K> },
}

impl<K> ModelEvent<K> {
    /// The path whose row is affected by this event.
    pub fn path(&self) -> &TreePath<K> {
        match self {
            ModelEvent::NodesChanged { path } | ModelEvent::StructureChanged { path } => path,
            ModelEvent::NodesInserted { parent, .. } | ModelEvent::NodesRemoved { parent, .. } => {
                parent
            }
        }
    }
}

type Queue<K> = Arc<Mutex<VecDeque<ModelEvent<K>>>>;

#[derive(Debug)]
struct HubInner<K> {
    next_id: u64,
    subscribers: Vec<(u64, Queue<K>)>,
}

/// Subscriber registry owned by a model.
#[derive(Debug)]
pub struct ModelEvents<K> {
    inner: Arc<Mutex<HubInner<K>>>,
}

impl<K> Default for ModelEvents<K> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HubInner {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }
}

impl<K: Clone> ModelEvents<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription<K> {
        let queue: Queue<K> = Arc::new(Mutex::new(VecDeque::new()));
        let mut id = 0;
        if let Ok(mut guard) = self.inner.lock() {
            id = guard.next_id;
            guard.next_id += 1;
            guard.subscribers.push((id, Arc::clone(&queue)));
            debug!("model subscription {} registered", id);
        }
        Subscription {
            id,
            queue,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live subscriber.
    pub fn emit(&self, event: ModelEvent<K>) {
        let Ok(guard) = self.inner.lock() else {
            return;
        };
        for (_, queue) in &guard.subscribers {
            if let Ok(mut queue) = queue.lock() {
                queue.push_back(event.clone());
            }
        }
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|g| g.subscribers.len()).unwrap_or(0)
    }
}

/// A registration with a [`ModelEvents`] hub.
///
/// Events are buffered until [`drain`](Self::drain) is called. The
/// registration is removed from the hub when the subscription is dropped.
#[derive(Debug)]
pub struct Subscription<K> {
    id: u64,
    queue: Queue<K>,
    hub: Weak<Mutex<HubInner<K>>>,
}

impl<K> Subscription<K> {
    /// Take every buffered event, oldest first.
    pub fn drain(&self) -> Vec<ModelEvent<K>> {
        self.queue
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of buffered events.
    pub fn pending(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl<K> Drop for Subscription<K> {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade()
            && let Ok(mut guard) = hub.lock()
        {
            guard.subscribers.retain(|(id, _)| *id != self.id);
            debug!("model subscription {} dropped", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_buffered_per_subscriber() {
        let hub: ModelEvents<u32> = ModelEvents::new();
        let first = hub.subscribe();
        let second = hub.subscribe();

        hub.emit(ModelEvent::StructureChanged {
            path: TreePath::root(),
        });

        assert_eq!(first.pending(), 1);
        assert_eq!(second.drain().len(), 1);
        assert_eq!(second.pending(), 0);
        assert_eq!(first.pending(), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub: ModelEvents<u32> = ModelEvents::new();
        let sub = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);

        // Emitting with no subscribers is harmless.
        hub.emit(ModelEvent::NodesChanged {
            path: TreePath::root(),
        });
    }

    #[test]
    fn test_subscription_outliving_hub() {
        let hub: ModelEvents<u32> = ModelEvents::new();
        let sub = hub.subscribe();
        drop(hub);
        assert!(sub.drain().is_empty());
        drop(sub);
    }
}
