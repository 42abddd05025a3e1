use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a task sits on the board.
#[derive(
    Debug, Clone, Eq, PartialEq, EnumIter, Deserialize, Default, Serialize, DeriveActiveEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_status")]
pub enum TaskStatus {
    #[sea_orm(string_value = "todo")]
    #[default]
    Todo,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "in_review")]
    InReview,
    #[sea_orm(string_value = "done")]
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(fmt, "todo"),
            TaskStatus::InProgress => write!(fmt, "in_progress"),
            TaskStatus::InReview => write!(fmt, "in_review"),
            TaskStatus::Done => write!(fmt, "done"),
        }
    }
}
