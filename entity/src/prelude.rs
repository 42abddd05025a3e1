//! `SeaORM` entity re-exports

pub use super::attachments::Entity as Attachments;
pub use super::comments::Entity as Comments;
pub use super::organization_members::Entity as OrganizationMembers;
pub use super::organizations::Entity as Organizations;
pub use super::projects::Entity as Projects;
pub use super::sessions::Entity as Sessions;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
