//! Lifecycle event notifications.
//!
//! The container emits lifecycle notifications during bootstrap; external
//! subsystems (logging, CLI introspection) subscribe rather than the
//! container knowing about them. Providers whose setup is asynchronous use
//! [`Event::Custom`] to announce completion ("database.connected"), since
//! sequential boot order only guarantees synchronous call order, not that
//! spawned work has finished.

use std::fmt;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Bootstrap lifecycle notifications plus provider-defined signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A provider's `register` hook is about to run.
    ProviderLoading { provider: String },
    /// A provider's `register` hook completed.
    ProviderLoaded { provider: String },
    /// Every loadable provider has completed `register`.
    ProvidersRegistered { count: usize },
    /// A provider's `boot` hook completed.
    ProviderBooted { provider: String },
    /// Provider-defined notification, e.g. "database.connected".
    Custom { name: String },
}

impl Event {
    /// Dotted channel name of the event.
    pub fn channel(&self) -> &str {
        match self {
            Event::ProviderLoading { .. } => "provider.loading",
            Event::ProviderLoaded { .. } => "provider.loaded",
            Event::ProvidersRegistered { .. } => "providers.registered",
            Event::ProviderBooted { .. } => "provider.booted",
            Event::Custom { name } => name,
        }
    }

    /// The provider this event concerns, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Event::ProviderLoading { provider }
            | Event::ProviderLoaded { provider }
            | Event::ProviderBooted { provider } => Some(provider),
            Event::ProvidersRegistered { .. } | Event::Custom { .. } => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.provider() {
            Some(provider) => write!(f, "{}({})", self.channel(), provider),
            None => f.write_str(self.channel()),
        }
    }
}

/// Interface for external subsystems that observe events synchronously.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Broadcast-backed event emitter, registered as the `events` service.
///
/// Cloning is cheap and every clone emits into the same channel. Emitting
/// with no subscribers is not an error.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    capacity: usize,
    sinks: Arc<RwLock<Vec<Arc<dyn EventSink>>>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self {
            tx,
            capacity,
            sinks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Deliver an event to all attached sinks and broadcast subscribers.
    ///
    /// Emission never blocks: when the channel is full the oldest queued
    /// event is dropped for any subscriber that has not yet read it, and a
    /// warning is logged.
    pub fn emit(&self, event: Event) {
        debug!(event = %event, "lifecycle event");
        if let Ok(sinks) = self.sinks.read() {
            for sink in sinks.iter() {
                sink.emit(&event);
            }
        }
        if self.tx.receiver_count() > 0 && self.tx.len() >= self.capacity {
            warn!(
                event = %event,
                capacity = self.capacity,
                "event channel full; lagging subscribers will miss events"
            );
        }
        let _ = self.tx.send(event);
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Attach a synchronous sink, called inline on every emit.
    pub fn attach(&self, sink: Arc<dyn EventSink>) {
        if let Ok(mut sinks) = self.sinks.write() {
            sinks.push(sink);
        }
    }

    /// Number of live broadcast subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}
