use super::error::Error;
use entity::attachments::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    task_id: Id,
    uploaded_by: Id,
    attachment_model: Model,
) -> Result<Model, Error> {
    debug!("New Attachment Model to be inserted: {attachment_model:?}");

    let attachment_active_model = ActiveModel {
        task_id: Set(task_id),
        uploaded_by: Set(uploaded_by),
        file_name: Set(attachment_model.file_name),
        url: Set(attachment_model.url),
        content_type: Set(attachment_model.content_type),
        size_bytes: Set(attachment_model.size_bytes),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(attachment_active_model.insert(db).await?)
}

/// Deletes `existing` and hands it back as the last known snapshot.
pub async fn delete(db: &DatabaseConnection, existing: Model) -> Result<Model, Error> {
    let result = Entity::delete_by_id(existing.id).exec(db).await?;

    if result.rows_affected == 0 {
        warn!("Attachment with id {} was already gone", existing.id);
        return Err(Error::not_found());
    }

    Ok(existing)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_task(db: &DatabaseConnection, task_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::TaskId.eq(task_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}
