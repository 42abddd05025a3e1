//! Emission boundary between committed mutations and the event relay.
//!
//! By the time a handler publishes, its write has committed. Nothing that
//! happens while notifying subscribers may turn that success into a failure,
//! so every emission runs inside its own panic boundary and serialization
//! problems degrade to a `null` payload.

use events::{Event, EventEmitter, EventType};
use serde::Serialize;
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};

use log::*;

/// Serializes a committed row for use as an event payload.
pub(crate) fn snapshot<T: Serialize>(model: &T) -> Value {
    serde_json::to_value(model).unwrap_or_else(|e| {
        error!("Failed to serialize event payload: {e}");
        Value::Null
    })
}

/// Hands `event` to `emitter`, logging instead of propagating any failure.
pub(crate) fn publish(emitter: &dyn EventEmitter, event: impl Into<Event>) {
    let event = event.into();
    let event_type = event.event_type();
    let organization_id = event.organization_id();

    if panic::catch_unwind(AssertUnwindSafe(|| emitter.emit(event))).is_err() {
        error!("Emitting {event_type} for organization {organization_id} panicked; mutation result is unaffected");
    } else {
        trace!("Emitted {event_type} for organization {organization_id}");
    }
}
