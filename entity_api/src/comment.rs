use super::error::Error;
use entity::comments::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    task_id: Id,
    author_id: Id,
    body: String,
) -> Result<Model, Error> {
    debug!("New Comment on task {task_id} by {author_id}");

    let now = chrono::Utc::now();

    let comment_active_model = ActiveModel {
        task_id: Set(task_id),
        author_id: Set(author_id),
        body: Set(body),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(comment_active_model.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, existing: Model, body: String) -> Result<Model, Error> {
    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        task_id: Unchanged(existing.task_id),
        author_id: Unchanged(existing.author_id),
        body: Set(body),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Deletes `existing` and hands it back as the last known snapshot.
pub async fn delete(db: &DatabaseConnection, existing: Model) -> Result<Model, Error> {
    let result = Entity::delete_by_id(existing.id).exec(db).await?;

    if result.rows_affected == 0 {
        warn!("Comment with id {} was already gone", existing.id);
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
