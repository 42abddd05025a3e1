use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{comment as CommentApi, Id};
use log::*;
use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for creating or editing a comment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub body: String,
}

/// GET all Comments on a Task
#[utoipa::path(
    get,
    path = "/tasks/{id}/comments",
    params(
        ("id" = String, Path, description = "Task id whose comments to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Comments on the Task", body = [domain::comments::Model]),
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
    debug!("GET all Comments for Task {task_id}");

    let comments = CommentApi::find_by_task(app_state.db_conn_ref(), &tenant, task_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), comments)))
}

/// POST create a new Comment on a Task
#[utoipa::path(
    post,
    path = "/tasks/{id}/comments",
    params(
        ("id" = String, Path, description = "Task id to comment on")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Successfully Created a New Comment", body = [domain::comments::Model]),
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
    Json(request): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Comment on Task {task_id}");

    let comment = CommentApi::create(
        app_state.db_conn_ref(),
        app_state.relay.as_ref(),
        &tenant,
        task_id,
        request.body,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), comment)))
}

/// PUT edit a Comment. Only its author may do so.
#[utoipa::path(
    put,
    path = "/comments/{id}",
    params(
        ("id" = String, Path, description = "Id of comment to update"),
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Successfully Updated Comment", body = [domain::comments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Comment not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(request): Json<CommentRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Comment {id}");

    let comment = CommentApi::update(
        app_state.db_conn_ref(),
        app_state.relay.as_ref(),
        &tenant,
        id,
        request.body,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), comment)))
}

/// DELETE a Comment. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(
        ("id" = String, Path, description = "Comment id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted the Comment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Comment not found"),
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
    debug!("DELETE Comment by id: {id}");

    CommentApi::delete(app_state.db_conn_ref(), app_state.relay.as_ref(), &tenant, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
