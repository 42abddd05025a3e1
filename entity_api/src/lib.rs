pub use entity::{
    attachments, comments, organization_members, organizations, projects, roles, sessions,
    task_status, tasks, users, Id,
};

pub mod attachment;
pub mod comment;
pub mod error;
pub mod organization;
pub mod organization_member;
pub mod project;
pub mod session;
pub mod task;
