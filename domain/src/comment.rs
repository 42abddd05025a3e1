use crate::comments::Model;
use crate::error::{EntityErrorKind, Error};
use crate::notify::{publish, snapshot};
use crate::{EventEmitter, Id, Tenant};
use entity_api::{comment, task};
use events::CommentEvent;
use sea_orm::DatabaseConnection;

const MAX_BODY_LEN: usize = 10_000;

pub async fn create(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    task_id: Id,
    body: String,
) -> Result<Model, Error> {
    let body = validate_body(body)?;

    let task = task::find_in_organization(db, tenant.organization_id(), task_id).await?;
    let comment = comment::create(db, task.id, tenant.user_id(), body).await?;

    publish(
        emitter,
        CommentEvent::CommentCreated {
            organization_id: tenant.organization_id(),
            task_id: task.id,
            comment_id: comment.id,
            data: snapshot(&comment),
        },
    );

    Ok(comment)
}

pub async fn update(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    id: Id,
    body: String,
) -> Result<Model, Error> {
    let body = validate_body(body)?;

    let existing = find_authored(db, tenant, id).await?;
    let comment = comment::update(db, existing, body).await?;

    publish(
        emitter,
        CommentEvent::CommentUpdated {
            organization_id: tenant.organization_id(),
            task_id: comment.task_id,
            comment_id: comment.id,
            data: snapshot(&comment),
        },
    );

    Ok(comment)
}

pub async fn delete(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    id: Id,
) -> Result<(), Error> {
    let existing = find_authored(db, tenant, id).await?;
    let deleted = comment::delete(db, existing).await?;

    publish(
        emitter,
        CommentEvent::CommentDeleted {
            organization_id: tenant.organization_id(),
            task_id: deleted.task_id,
            comment_id: deleted.id,
            data: snapshot(&deleted),
        },
    );

    Ok(())
}

pub async fn find_by_task(
    db: &DatabaseConnection,
    tenant: &Tenant,
    task_id: Id,
) -> Result<Vec<Model>, Error> {
    let task = task::find_in_organization(db, tenant.organization_id(), task_id).await?;
    Ok(comment::find_by_task(db, task.id).await?)
}

/// Loads a comment the caller wrote, on a task inside the caller's organization.
async fn find_authored(db: &DatabaseConnection, tenant: &Tenant, id: Id) -> Result<Model, Error> {
    let existing = comment::find_by_id(db, id).await?;
    // A comment on another tenant's task is reported as missing, not forbidden.
    task::find_in_organization(db, tenant.organization_id(), existing.task_id).await?;

    if existing.author_id != tenant.user_id() {
        return Err(Error::entity(EntityErrorKind::Forbidden));
    }

    Ok(existing)
}

fn validate_body(body: String) -> Result<String, Error> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("comment body is required"));
    }
    if trimmed.chars().count() > MAX_BODY_LEN {
        return Err(Error::invalid(format!(
            "comment body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(trimmed.to_owned())
}
