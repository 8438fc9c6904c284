use crate::models::{Command, Counter, CounterError};
use crate::services::registry::{ObserverId, SubscriberRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::oneshot;

#[derive(Debug, Default)]
struct Shared {
    counter: Counter,
    registry: SubscriberRegistry<i64>,
}

/// Owns the counter and the observers waiting on it.
///
/// Both live behind one mutex, so applying a command and fanning its value out
/// happen as a single step relative to other commands and registrations. The
/// lock is never held across an await point.
#[derive(Debug, Default)]
pub struct CounterService {
    shared: Mutex<Shared>,
    sessions: AtomicUsize,
}

impl CounterService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn value(&self) -> i64 {
        self.lock().counter.value()
    }
    /// Applies `command` and, on success, delivers the new value to every
    /// observer registered at this moment.
    pub fn process(&self, command: Command) -> Result<i64, CounterError> {
        let mut shared = self.lock();
        let value = shared.counter.apply(command)?;
        let delivered = Self::broadcast(&mut shared, value);
        tracing::debug!(%command, value, delivered, "command applied");
        Ok(value)
    }
    fn broadcast(shared: &mut Shared, value: i64) -> usize {
        shared.registry.drain_and_deliver(value)
    }
    pub fn register(self: &Arc<Self>) -> Observer {
        let (id, receiver) = self.lock().registry.register();
        Observer {
            id,
            receiver: Some(receiver),
            service: Arc::downgrade(self),
        }
    }
    pub fn unregister(&self, id: ObserverId) -> bool {
        self.lock().registry.unregister(id)
    }
    /// Number of observers currently waiting for a value.
    pub fn observers(&self) -> usize {
        self.lock().registry.len()
    }
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::Relaxed)
    }
    pub fn open_session(self: &Arc<Self>, peer: String) -> SessionGuard {
        self.sessions.fetch_add(1, Ordering::Relaxed);
        tracing::trace!("`{}` connected", peer);
        SessionGuard {
            peer,
            service: self.clone(),
        }
    }
}

/// One pending registration. Resolves with the next committed value.
///
/// Dropping the handle before delivery removes it from the registry.
#[derive(Debug)]
pub struct Observer {
    id: ObserverId,
    receiver: Option<oneshot::Receiver<i64>>,
    service: Weak<CounterService>,
}

impl Observer {
    pub fn id(&self) -> ObserverId {
        self.id
    }
    /// `None` once the value has been taken, or when the registration went
    /// away without one.
    pub async fn next_value(&mut self) -> Option<i64> {
        let receiver = self.receiver.as_mut()?;
        let value = receiver.await.ok();
        self.receiver = None;
        value
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        if let Some(service) = self.service.upgrade() {
            service.unregister(self.id);
        }
    }
}

/// Tracks one open streaming connection for the lifetime of its response.
#[derive(Debug)]
pub struct SessionGuard {
    peer: String,
    service: Arc<CounterService>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.service.sessions.fetch_sub(1, Ordering::Relaxed);
        tracing::trace!("`{}` disconnected", self.peer);
    }
}
