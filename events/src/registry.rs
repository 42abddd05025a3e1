use crate::event::{Channel, Event};
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Decides whether a listener wants a given event.
pub type Predicate = Box<dyn Fn(&Event) -> bool + Send + Sync>;

/// Receives the events its predicate accepted.
pub type Callback = Box<dyn Fn(&Event) -> Result<(), ListenerError> + Send + Sync>;

/// Unique identifier for a listener registration (relay-generated).
///
/// Ids are handed out in increasing order, so ordering by id is
/// registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Why a listener could not take an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The receiving end is gone; the registration is stale and gets pruned.
    Disconnected,
    /// The listener refused this event but stays registered.
    Rejected(String),
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ListenerError::Disconnected => write!(f, "listener disconnected"),
            ListenerError::Rejected(reason) => write!(f, "listener rejected event: {reason}"),
        }
    }
}

impl std::error::Error for ListenerError {}

pub(crate) struct Registration {
    pub(crate) channel: Channel,
    predicate: Predicate,
    callback: Callback,
}

impl Registration {
    /// Runs the predicate and, if it accepts, the callback.
    /// Returns `Ok(false)` when the predicate filtered the event out.
    pub(crate) fn deliver(&self, event: &Event) -> Result<bool, ListenerError> {
        if !(self.predicate)(event) {
            return Ok(false);
        }
        (self.callback)(event)?;
        Ok(true)
    }
}

/// Listener registry with dual indices: registration lookup by id and
/// ordered per-channel membership for dispatch.
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,

    /// Primary storage: lookup by listener id for dispatch/teardown - O(1)
    listeners: DashMap<ListenerId, Arc<Registration>>,

    /// Secondary index: registration-ordered listener ids per channel
    channel_index: DashMap<Channel, BTreeSet<ListenerId>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: DashMap::new(),
            channel_index: DashMap::new(),
        }
    }

    pub(crate) fn register(
        &self,
        channel: Channel,
        predicate: Predicate,
        callback: Callback,
    ) -> ListenerId {
        let listener_id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.listeners.insert(
            listener_id,
            Arc::new(Registration {
                channel,
                predicate,
                callback,
            }),
        );

        self.channel_index
            .entry(channel)
            .or_default()
            .insert(listener_id);

        listener_id
    }

    /// Remove a registration. Returns `false` if it was already gone.
    pub(crate) fn unregister(&self, listener_id: ListenerId) -> bool {
        let Some((_, registration)) = self.listeners.remove(&listener_id) else {
            return false;
        };

        if let Some(mut ids) = self.channel_index.get_mut(&registration.channel) {
            ids.remove(&listener_id);
        }
        self.channel_index
            .remove_if(&registration.channel, |_, ids| ids.is_empty());

        true
    }

    /// Snapshot of listener ids on a channel in registration order.
    /// No map guard outlives this call.
    pub(crate) fn listener_ids(&self, channel: Channel) -> Vec<ListenerId> {
        self.channel_index
            .get(&channel)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn get(&self, listener_id: ListenerId) -> Option<Arc<Registration>> {
        self.listeners
            .get(&listener_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn count(&self, channel: Channel) -> usize {
        self.channel_index
            .get(&channel)
            .map(|ids| ids.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept_all() -> (Predicate, Callback) {
        (Box::new(|_| true), Box::new(|_| Ok(())))
    }

    #[test]
    fn listener_ids_come_back_in_registration_order() {
        let registry = ListenerRegistry::new();
        let registered: Vec<ListenerId> = (0..5)
            .map(|_| {
                let (predicate, callback) = accept_all();
                registry.register(Channel::TaskUpdate, predicate, callback)
            })
            .collect();

        assert_eq!(registry.listener_ids(Channel::TaskUpdate), registered);
        assert!(registry.listener_ids(Channel::CommentUpdate).is_empty());
    }

    #[test]
    fn unregister_is_idempotent_and_cleans_up_empty_channels() {
        let registry = ListenerRegistry::new();
        let (predicate, callback) = accept_all();
        let listener_id = registry.register(Channel::CommentUpdate, predicate, callback);

        assert!(registry.unregister(listener_id));
        assert!(!registry.unregister(listener_id));
        assert_eq!(registry.count(Channel::CommentUpdate), 0);
        assert!(registry.get(listener_id).is_none());
        assert!(!registry.channel_index.contains_key(&Channel::CommentUpdate));
    }
}
