use crate::event::{Channel, Event, EventType};
use crate::registry::{ListenerError, ListenerId, ListenerRegistry};
use crate::EventEmitter;
use log::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners whose predicate accepted the event and whose callback succeeded
    pub delivered: usize,
    /// Listeners removed because their receiving end had gone away
    pub pruned: usize,
    /// Listeners that rejected the event or panicked
    pub failed: usize,
}

/// In-process dispatcher connecting event producers to listeners.
///
/// One instance is built at process start and shared (behind an `Arc`) by
/// every producer and subscriber. Dispatch is synchronous: `emit` returns only
/// after every matching listener on the event's channel has run.
pub struct Relay {
    registry: Arc<ListenerRegistry>,
}

impl Relay {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ListenerRegistry::new()),
        }
    }

    /// Register `listener` for every event on `channel` accepted by `predicate`.
    ///
    /// The returned `Subscription` is the only way to remove the registration;
    /// dropping it removes the registration as well.
    pub fn subscribe<P, F>(&self, channel: Channel, predicate: P, listener: F) -> Subscription
    where
        P: Fn(&Event) -> bool + Send + Sync + 'static,
        F: Fn(&Event) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let listener_id = self
            .registry
            .register(channel, Box::new(predicate), Box::new(listener));

        debug!("Registered {listener_id} on channel {channel}");

        Subscription {
            listener_id,
            channel,
            registry: Arc::downgrade(&self.registry),
            active: true,
        }
    }

    /// Deliver `event` to every matching listener on its channel, in
    /// registration order.
    ///
    /// Failures stay inside the relay: a listener that reports
    /// `Disconnected` is pruned, one that rejects the event is logged, and a
    /// panicking listener is logged without stopping delivery to the rest.
    pub fn dispatch(&self, event: &Event) -> Delivery {
        let channel = event.channel();
        let mut delivery = Delivery::default();

        for listener_id in self.registry.listener_ids(channel) {
            // Re-check on each step: an earlier listener may have torn this one down.
            let Some(registration) = self.registry.get(listener_id) else {
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| registration.deliver(event))) {
                Ok(Ok(true)) => delivery.delivered += 1,
                Ok(Ok(false)) => {}
                Ok(Err(ListenerError::Disconnected)) => {
                    debug!("Pruning {listener_id} on channel {channel}: receiver disconnected");
                    if self.registry.unregister(listener_id) {
                        delivery.pruned += 1;
                    }
                }
                Ok(Err(e)) => {
                    warn!(
                        "Failed to deliver {} event to {listener_id}: {e}",
                        event.event_type()
                    );
                    delivery.failed += 1;
                }
                Err(payload) => {
                    error!(
                        "{listener_id} panicked while handling {} event: {}",
                        event.event_type(),
                        panic_message(payload.as_ref())
                    );
                    delivery.failed += 1;
                }
            }
        }

        trace!(
            "Dispatched {} event on {channel}: {delivery:?}",
            event.event_type()
        );

        delivery
    }

    /// Number of listeners currently registered on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        self.registry.count(channel)
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

impl EventEmitter for Relay {
    fn emit(&self, event: Event) {
        self.dispatch(&event);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Teardown handle for one listener registration.
///
/// Holds only a weak reference to the relay's registry, so an outstanding
/// subscription never keeps a relay alive.
#[derive(Debug)]
pub struct Subscription {
    listener_id: ListenerId,
    channel: Channel,
    registry: Weak<ListenerRegistry>,
    active: bool,
}

impl Subscription {
    pub fn listener_id(&self) -> ListenerId {
        self.listener_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remove the registration from the relay. Calling this more than once
    /// is a no-op.
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Some(registry) = self.registry.upgrade() {
            if registry.unregister(self.listener_id) {
                debug!(
                    "Unregistered {} from channel {}",
                    self.listener_id, self.channel
                );
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
