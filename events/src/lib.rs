//! Event relay infrastructure for the task tracker.
//!
//! This crate provides the in-process publish/subscribe relay that carries
//! mutation notifications from domain handlers to live client subscriptions.
//!
//! # Architecture
//!
//! - **Event**: Tagged unions per channel (`TaskEvent`, `CommentEvent`,
//!   `AttachmentEvent`) wrapped by a top-level `Event` enum
//! - **EventEmitter**: Trait producers depend on to hand events to the relay
//! - **Relay**: Synchronous fanout to every listener registered on the event's
//!   channel whose predicate accepts the event
//! - **Subscription**: Teardown handle returned from `Relay::subscribe`
//!
//! Events are a notification side-channel: they are never persisted, never
//! replayed, and a listener that is not registered at emission time misses them.
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use uuid::Uuid;

pub mod event;
pub mod registry;
pub mod relay;

pub use event::{AttachmentEvent, Channel, CommentEvent, Event, EventType, TaskEvent};
pub use registry::{ListenerError, ListenerId};
pub use relay::{Delivery, Relay, Subscription};

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Hands freshly built events to whatever relays them to subscribers.
///
/// Domain handlers depend on this trait rather than on `Relay` directly so
/// tests can substitute a recording implementation. Implementations must not
/// let a delivery failure escape into the caller: by the time a handler emits,
/// its mutation has already committed.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: Event);

    fn emit_task_update(&self, event: TaskEvent) {
        self.emit(Event::Task(event));
    }

    fn emit_comment_update(&self, event: CommentEvent) {
        self.emit(Event::Comment(event));
    }

    fn emit_attachment_update(&self, event: AttachmentEvent) {
        self.emit(Event::Attachment(event));
    }
}
