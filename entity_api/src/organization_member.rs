use super::error::Error;
use entity::organization_members::{Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, DatabaseConnection};

/// Finds the membership tying `user_id` to `organization_id`, if any.
pub async fn find(
    db: &DatabaseConnection,
    organization_id: Id,
    user_id: Id,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::OrganizationId.eq(organization_id))
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?)
}
