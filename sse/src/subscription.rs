use crate::scope::SubscriptionScope;
use events::{Channel, Event, ListenerError, Relay, Subscription};
use futures::Stream;
use log::*;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Lifecycle of one client subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Scope resolved, listener not yet registered
    Created,
    /// Listener registered and receiving filtered events
    Active,
    /// Listener removed; no further events will arrive
    TornDown,
}

/// Opens scoped event streams on the shared relay.
#[derive(Clone)]
pub struct Subscriptions {
    relay: Arc<Relay>,
}

impl Subscriptions {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }

    /// Register a listener on `channel` limited to `scope` and return the
    /// stream it feeds.
    pub fn open(&self, channel: Channel, scope: SubscriptionScope) -> EventStream {
        let mut stream = EventStream::created(channel, scope);
        let (tx, rx) = mpsc::unbounded_channel();

        let subscription = self.relay.subscribe(
            channel,
            move |event| scope.matches(event),
            move |event| {
                tx.send(event.clone())
                    .map_err(|_| ListenerError::Disconnected)
            },
        );

        info!(
            "Opened {channel} subscription {} for organization {}{}",
            subscription.listener_id(),
            scope.organization_id(),
            scope
                .task_id()
                .map(|task_id| format!(" task {task_id}"))
                .unwrap_or_default()
        );

        stream.activate(subscription, rx);
        stream
    }

    /// Number of live listeners on `channel`.
    pub fn listener_count(&self, channel: Channel) -> usize {
        self.relay.listener_count(channel)
    }
}

/// Filtered events for one client connection.
///
/// Owns the relay registration: dropping the stream tears it down.
pub struct EventStream {
    channel: Channel,
    scope: SubscriptionScope,
    state: SubscriptionState,
    subscription: Option<Subscription>,
    receiver: Option<UnboundedReceiver<Event>>,
}

impl EventStream {
    fn created(channel: Channel, scope: SubscriptionScope) -> Self {
        Self {
            channel,
            scope,
            state: SubscriptionState::Created,
            subscription: None,
            receiver: None,
        }
    }

    fn activate(&mut self, subscription: Subscription, receiver: UnboundedReceiver<Event>) {
        self.subscription = Some(subscription);
        self.receiver = Some(receiver);
        self.state = SubscriptionState::Active;
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Remove the listener now. Events already queued are discarded.
    /// Closing an already closed stream is a no-op.
    pub fn close(&mut self) {
        if self.state == SubscriptionState::TornDown {
            return;
        }

        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!(
                "Closed {} subscription {} for organization {}",
                self.channel,
                subscription.listener_id(),
                self.scope.organization_id()
            );
        }
        self.receiver = None;
        self.state = SubscriptionState::TornDown;
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.receiver.as_mut() {
            Some(receiver) => receiver.poll_recv(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.close();
    }
}
