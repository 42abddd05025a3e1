use crate::error::{EntityErrorKind, Error};
use crate::notify::{publish, snapshot};
use crate::tasks::Model;
use crate::{EventEmitter, Id, Tenant};
use entity_api::{organization_member, project, task};
use events::TaskEvent;
use sea_orm::DatabaseConnection;

use log::*;

const MAX_TITLE_LEN: usize = 200;

pub async fn create(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    task_model: Model,
) -> Result<Model, Error> {
    let task_model = validate(task_model)?;

    let project = project::find_in_organization(db, tenant.organization_id(), task_model.project_id)
        .await?;
    ensure_assignee_is_member(db, tenant, task_model.assignee_id).await?;

    let task = task::create(db, &project, task_model, tenant.user_id()).await?;
    debug!("Created task {} in project {}", task.id, project.id);

    publish(
        emitter,
        TaskEvent::TaskCreated {
            organization_id: tenant.organization_id(),
            task_id: task.id,
            data: snapshot(&task),
        },
    );

    Ok(task)
}

pub async fn update(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    id: Id,
    task_model: Model,
) -> Result<Model, Error> {
    let task_model = validate(task_model)?;

    let existing = task::find_in_organization(db, tenant.organization_id(), id).await?;
    ensure_assignee_is_member(db, tenant, task_model.assignee_id).await?;

    let task = task::update(db, existing, task_model).await?;

    publish(
        emitter,
        TaskEvent::TaskUpdated {
            organization_id: tenant.organization_id(),
            task_id: task.id,
            data: snapshot(&task),
        },
    );

    Ok(task)
}

pub async fn delete(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    id: Id,
) -> Result<(), Error> {
    let existing = task::find_in_organization(db, tenant.organization_id(), id).await?;
    let deleted = task::delete(db, existing).await?;

    publish(
        emitter,
        TaskEvent::TaskDeleted {
            organization_id: tenant.organization_id(),
            task_id: deleted.id,
            data: snapshot(&deleted),
        },
    );

    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, tenant: &Tenant, id: Id) -> Result<Model, Error> {
    Ok(task::find_in_organization(db, tenant.organization_id(), id).await?)
}

pub async fn find_by_project(
    db: &DatabaseConnection,
    tenant: &Tenant,
    project_id: Id,
) -> Result<Vec<Model>, Error> {
    // Resolve the project first so a foreign project is NotFound rather than empty.
    let project = project::find_in_organization(db, tenant.organization_id(), project_id).await?;
    Ok(task::find_by_project(db, tenant.organization_id(), project.id).await?)
}

fn validate(task_model: Model) -> Result<Model, Error> {
    let title = task_model.title.trim();
    if title.is_empty() {
        return Err(Error::invalid("task title is required"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(Error::invalid(format!(
            "task title must be at most {MAX_TITLE_LEN} characters"
        )));
    }

    Ok(Model {
        title: title.to_owned(),
        ..task_model
    })
}

async fn ensure_assignee_is_member(
    db: &DatabaseConnection,
    tenant: &Tenant,
    assignee_id: Option<Id>,
) -> Result<(), Error> {
    let Some(assignee_id) = assignee_id else {
        return Ok(());
    };

    match organization_member::find(db, tenant.organization_id(), assignee_id).await? {
        Some(_) => Ok(()),
        None => Err(Error::entity(EntityErrorKind::Invalid(
            "assignee is not a member of this organization".to_string(),
        ))),
    }
}
