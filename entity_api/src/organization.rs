use super::error::Error;
use entity::organizations::{Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, DatabaseConnection};

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}
