use super::error::Error;
use chrono::Utc;
use entity::projects::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    organization_id: Id,
    project_model: Model,
) -> Result<Model, Error> {
    debug!("New Project Model to be inserted: {project_model:?}");

    let now = Utc::now();

    let project_active_model = ActiveModel {
        organization_id: Set(organization_id),
        name: Set(project_model.name),
        description: Set(project_model.description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(project_active_model.insert(db).await?)
}

/// Finds a project only if it belongs to `organization_id`.
pub async fn find_in_organization(
    db: &DatabaseConnection,
    organization_id: Id,
    id: Id,
) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .filter(Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_organization(
    db: &DatabaseConnection,
    organization_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::OrganizationId.eq(organization_id))
        .order_by_asc(Column::Name)
        .all(db)
        .await?)
}
