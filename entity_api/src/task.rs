use super::error::Error;
use entity::tasks::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use log::*;

/// Inserts a task under `project`, copying the project's organization onto the row.
pub async fn create(
    db: &DatabaseConnection,
    project: &entity::projects::Model,
    task_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!("New Task Model to be inserted: {task_model:?}");

    let now = chrono::Utc::now();

    let task_active_model = ActiveModel {
        project_id: Set(project.id),
        organization_id: Set(project.organization_id),
        title: Set(task_model.title),
        description: Set(task_model.description),
        status: Set(task_model.status),
        assignee_id: Set(task_model.assignee_id),
        due_date: Set(task_model.due_date),
        created_by: Set(user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(task_active_model.insert(db).await?)
}

/// Applies the mutable fields of `model` onto `existing`.
/// Project, organization and authorship never change after creation.
pub async fn update(db: &DatabaseConnection, existing: Model, model: Model) -> Result<Model, Error> {
    debug!("Existing Task model to be Updated: {existing:?}");

    let active_model = ActiveModel {
        id: Unchanged(existing.id),
        project_id: Unchanged(existing.project_id),
        organization_id: Unchanged(existing.organization_id),
        title: Set(model.title),
        description: Set(model.description),
        status: Set(model.status),
        assignee_id: Set(model.assignee_id),
        due_date: Set(model.due_date),
        created_by: Unchanged(existing.created_by),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?.try_into_model()?)
}

/// Deletes `existing` and hands it back as the last known snapshot.
pub async fn delete(db: &DatabaseConnection, existing: Model) -> Result<Model, Error> {
    let result = Entity::delete_by_id(existing.id).exec(db).await?;

    if result.rows_affected == 0 {
        warn!("Task with id {} was already gone", existing.id);
        return Err(Error::not_found());
    }

    Ok(existing)
}

/// Finds a task only if it belongs to `organization_id`.
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

pub async fn find_by_project(
    db: &DatabaseConnection,
    organization_id: Id,
    project_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::OrganizationId.eq(organization_id))
        .filter(Column::ProjectId.eq(project_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::task_status::TaskStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn task_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            project_id: Id::new_v4(),
            organization_id: Id::new_v4(),
            title: "Ship the relay".to_owned(),
            description: None,
            status: TaskStatus::Todo,
            assignee_id: None,
            due_date: None,
            created_by: Id::new_v4(),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn update_returns_the_updated_task() -> Result<(), Error> {
        let existing = task_model();
        let updated = Model {
            status: TaskStatus::Done,
            ..existing.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![updated.clone()]])
            .into_connection();

        let task = update(&db, existing, updated.clone()).await?;

        assert_eq!(task.status, TaskStatus::Done);
        Ok(())
    }

    #[tokio::test]
    async fn delete_returns_the_deleted_snapshot() -> Result<(), Error> {
        let existing = task_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let deleted = delete(&db, existing.clone()).await?;

        assert_eq!(deleted, existing);
        Ok(())
    }

    #[tokio::test]
    async fn delete_of_a_vanished_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, task_model()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_in_organization_is_not_found_across_tenants() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let result = find_in_organization(&db, Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }
}
