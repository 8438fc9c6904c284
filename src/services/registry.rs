use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl Display for ObserverId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

/// Observers waiting for the next value.
///
/// Every registration is served at most once: [`drain_and_deliver`] hands the
/// value to everyone currently pending and empties the set, so a receiver
/// that wants the following value has to register again.
///
/// [`drain_and_deliver`]: SubscriberRegistry::drain_and_deliver
#[derive(Debug)]
pub struct SubscriberRegistry<V> {
    next_id: u64,
    pending: HashMap<ObserverId, oneshot::Sender<V>>,
}

impl<V> Default for SubscriberRegistry<V> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: HashMap::new(),
        }
    }
}

impl<V: Clone> SubscriberRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn register(&mut self) -> (ObserverId, oneshot::Receiver<V>) {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        (id, rx)
    }
    /// Removes `id` if it is still pending. Returns `false` when it was
    /// already delivered or removed.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        self.pending.remove(&id).is_some()
    }
    /// Delivers `value` to every pending observer and clears the set.
    /// Returns the number of receivers that were still alive.
    pub fn drain_and_deliver(&mut self, value: V) -> usize {
        std::mem::take(&mut self.pending)
            .into_values()
            .map(|tx| tx.send(value.clone()))
            .filter(Result::is_ok)
            .count()
    }
    pub fn len(&self) -> usize {
        self.pending.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out() {
        let mut registry = SubscriberRegistry::new();
        let receivers = (0..4).map(|_| registry.register().1).collect::<Vec<_>>();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.drain_and_deliver(7), 4);
        assert!(registry.is_empty());
        for rx in receivers {
            assert_eq!(rx.await.unwrap(), 7);
        }
        // nobody left to deliver to
        assert_eq!(registry.drain_and_deliver(8), 0);
    }

    #[tokio::test]
    async fn test_register_after_drain_waits_for_next() {
        let mut registry = SubscriberRegistry::new();
        let (_, first) = registry.register();
        registry.drain_and_deliver(1);
        let (_, mut second) = registry.register();
        assert!(second.try_recv().is_err());
        registry.drain_and_deliver(2);
        assert_eq!(first.await.unwrap(), 1);
        assert_eq!(second.await.unwrap(), 2);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = SubscriberRegistry::<i64>::new();
        let (id, _rx) = registry.register();
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unregister_after_delivery() {
        let mut registry = SubscriberRegistry::new();
        let (id, mut rx) = registry.register();
        assert_eq!(registry.drain_and_deliver(3), 1);
        assert!(!registry.unregister(id));
        assert_eq!(rx.try_recv().unwrap(), 3);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_skipped() {
        let mut registry = SubscriberRegistry::new();
        let (_, rx) = registry.register();
        let (_, mut alive) = registry.register();
        drop(rx);
        assert_eq!(registry.drain_and_deliver(5), 1);
        assert_eq!(alive.try_recv().unwrap(), 5);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = SubscriberRegistry::<i64>::new();
        let (a, _ra) = registry.register();
        let (b, _rb) = registry.register();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "observer#0");
    }
}
