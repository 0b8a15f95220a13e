use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use hostlog_core_types::{HostlogError, LoggerEvent};

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {
    fn topic(&self) -> &str;
}

impl Event for LoggerEvent {
    fn topic(&self) -> &str {
        LoggerEvent::topic(self)
    }
}

pub type Handler<E> = Arc<dyn Fn(&E) -> Result<(), HostlogError> + Send + Sync>;

/// Which events a subscriber receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subscription {
    Topic(String),
    All,
}

impl Subscription {
    pub fn topic(name: impl Into<String>) -> Self {
        Self::Topic(name.into())
    }

    fn matches<E: Event>(&self, event: &E) -> bool {
        match self {
            Subscription::All => true,
            Subscription::Topic(name) => name == event.topic(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    /// Delivers `event` to every matching subscriber on the caller's stack,
    /// in subscription order. The first handler error stops delivery and is
    /// returned.
    fn publish(&self, event: E) -> Result<(), HostlogError>;
    fn subscribe(&self, subscription: Subscription, handler: Handler<E>) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

struct Entry<E> {
    id: SubscriptionId,
    subscription: Subscription,
    handler: Handler<E>,
}

impl<E> Clone for Entry<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            subscription: self.subscription.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

/// Simple in-memory bus. Handlers run synchronously inside `publish`.
pub struct InMemoryBus<E>
where
    E: Event,
{
    entries: RwLock<Vec<Entry<E>>>,
    next_id: AtomicU64,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn subscriber_count(&self) -> usize {
        self.entries.read().len()
    }
}

impl<E> Default for InMemoryBus<E>
where
    E: Event,
{
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    fn publish(&self, event: E) -> Result<(), HostlogError> {
        // Snapshot so handlers may subscribe or publish re-entrantly.
        let entries: Vec<Entry<E>> = self.entries.read().clone();
        trace!(topic = event.topic(), subscribers = entries.len(), "publish");
        for entry in entries
            .iter()
            .filter(|entry| entry.subscription.matches(&event))
        {
            (entry.handler)(&event)?;
        }
        Ok(())
    }

    fn subscribe(&self, subscription: Subscription, handler: Handler<E>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.write().push(Entry {
            id,
            subscription,
            handler,
        });
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut guard = self.entries.write();
        let before = guard.len();
        guard.retain(|entry| entry.id != id);
        guard.len() != before
    }
}
