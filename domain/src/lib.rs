//! Task tracker domain operations.
//!
//! Every mutation here follows the same sequence: validate input, confirm the
//! target lives inside the caller's organization, commit through `entity_api`,
//! and only then emit exactly one event describing the committed row. A
//! mutation that fails at any step emits nothing.

pub use entity_api::{
    attachments, comments, organization_members, organizations, projects, roles, sessions,
    task_status, tasks, users, Id,
};
pub use events::EventEmitter;

pub mod attachment;
pub mod comment;
pub mod error;
pub mod organization;
pub mod project;
pub mod task;
pub mod tenant;

mod notify;

pub use tenant::Tenant;

#[cfg(test)]
#[cfg(feature = "mock")]
pub(crate) mod test_support {
    use crate::{EventEmitter, Id, Tenant};
    use events::Event;
    use std::sync::Mutex;

    /// Records every event handed to it.
    #[derive(Default)]
    pub(crate) struct RecordingEmitter {
        pub(crate) events: Mutex<Vec<Event>>,
    }

    impl RecordingEmitter {
        pub(crate) fn emitted(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventEmitter for RecordingEmitter {
        fn emit(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// Fails every emission the hard way.
    pub(crate) struct PanickingEmitter;

    impl EventEmitter for PanickingEmitter {
        fn emit(&self, _event: Event) {
            panic!("emitter failure");
        }
    }

    pub(crate) fn tenant(organization_id: Id) -> Tenant {
        Tenant::new(Id::new_v4(), organization_id)
    }

    pub(crate) fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
        chrono::Utc::now().into()
    }
}
