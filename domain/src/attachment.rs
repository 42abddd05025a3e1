use crate::attachments::Model;
use crate::error::{EntityErrorKind, Error};
use crate::notify::{publish, snapshot};
use crate::{EventEmitter, Id, Tenant};
use entity_api::{attachment, task};
use events::AttachmentEvent;
use sea_orm::DatabaseConnection;

/// Largest attachment the tracker will record metadata for (100 MiB).
const MAX_SIZE_BYTES: i64 = 100 * 1024 * 1024;

pub async fn create(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    task_id: Id,
    attachment_model: Model,
) -> Result<Model, Error> {
    validate(&attachment_model)?;

    let task = task::find_in_organization(db, tenant.organization_id(), task_id).await?;
    let attachment = attachment::create(db, task.id, tenant.user_id(), attachment_model).await?;

    publish(
        emitter,
        AttachmentEvent::AttachmentCreated {
            organization_id: tenant.organization_id(),
            task_id: task.id,
            attachment_id: attachment.id,
            data: snapshot(&attachment),
        },
    );

    Ok(attachment)
}

/// Removes an attachment. Only the member who uploaded it may do so.
pub async fn delete(
    db: &DatabaseConnection,
    emitter: &dyn EventEmitter,
    tenant: &Tenant,
    id: Id,
) -> Result<(), Error> {
    let existing = attachment::find_by_id(db, id).await?;
    task::find_in_organization(db, tenant.organization_id(), existing.task_id).await?;

    if existing.uploaded_by != tenant.user_id() {
        return Err(Error::entity(EntityErrorKind::Forbidden));
    }

    let deleted = attachment::delete(db, existing).await?;

    publish(
        emitter,
        AttachmentEvent::AttachmentDeleted {
            organization_id: tenant.organization_id(),
            task_id: deleted.task_id,
            attachment_id: deleted.id,
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
    Ok(attachment::find_by_task(db, task.id).await?)
}

fn validate(attachment_model: &Model) -> Result<(), Error> {
    if attachment_model.file_name.trim().is_empty() {
        return Err(Error::invalid("attachment file name is required"));
    }
    if attachment_model.content_type.trim().is_empty() {
        return Err(Error::invalid("attachment content type is required"));
    }
    let url = attachment_model.url.as_str();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(Error::invalid("attachment url must be http(s)"));
    }
    if attachment_model.size_bytes <= 0 || attachment_model.size_bytes > MAX_SIZE_BYTES {
        return Err(Error::invalid(format!(
            "attachment size must be between 1 and {MAX_SIZE_BYTES} bytes"
        )));
    }
    Ok(())
}
