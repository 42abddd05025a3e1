use uuid::Uuid;

pub mod prelude;

// Tenancy and identity
pub mod organization_members;
pub mod organizations;
pub mod roles;
pub mod sessions;
pub mod users;

// Task tracking
pub mod attachments;
pub mod comments;
pub mod projects;
pub mod task_status;
pub mod tasks;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
