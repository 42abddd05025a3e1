use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{attachment as AttachmentApi, attachments::Model, Id};
use log::*;

/// GET all Attachments on a Task
#[utoipa::path(
    get,
    path = "/tasks/{id}/attachments",
    params(
        ("id" = String, Path, description = "Task id whose attachments to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Attachments on the Task", body = [domain::attachments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(task_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Attachments for Task {task_id}");

    let attachments =
        AttachmentApi::find_by_task(app_state.db_conn_ref(), &tenant, task_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), attachments)))
}

/// POST record a new Attachment on a Task. The file must already be uploaded.
#[utoipa::path(
    post,
    path = "/tasks/{id}/attachments",
    params(
        ("id" = String, Path, description = "Task id to attach to")
    ),
    request_body = domain::attachments::Model,
    responses(
        (status = 201, description = "Successfully Created a New Attachment", body = [domain::attachments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(task_id): Path<Id>,
    Json(attachment_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Attachment on Task {task_id}: {attachment_model:?}");

    let attachment = AttachmentApi::create(
        app_state.db_conn_ref(),
        app_state.relay.as_ref(),
        &tenant,
        task_id,
        attachment_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), attachment)))
}

/// DELETE an Attachment. Only its uploader may do so.
#[utoipa::path(
    delete,
    path = "/attachments/{id}",
    params(
        ("id" = String, Path, description = "Attachment id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted the Attachment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attachment not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Attachment by id: {id}");

    AttachmentApi::delete(app_state.db_conn_ref(), app_state.relay.as_ref(), &tenant, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
