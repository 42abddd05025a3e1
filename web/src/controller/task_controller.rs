use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{task as TaskApi, tasks::Model, Id};
use log::*;

/// POST create a new Task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = domain::tasks::Model,
    responses(
        (status = 201, description = "Successfully Created a New Task", body = [domain::tasks::Model]),
        (status = 404, description = "Project not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(task_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Task from: {task_model:?}");

    let task = TaskApi::create(
        app_state.db_conn_ref(),
        app_state.relay.as_ref(),
        &tenant,
        task_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), task)))
}

/// GET a particular Task specified by its id.
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Task by its id", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Task by id: {id}");

    let task = TaskApi::find_by_id(app_state.db_conn_ref(), &tenant, id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// PUT update a Task
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Id of task to update"),
    ),
    request_body = domain::tasks::Model,
    responses(
        (status = 200, description = "Successfully Updated Task", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
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
    Json(task_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Task {id} with: {task_model:?}");

    let task = TaskApi::update(
        app_state.db_conn_ref(),
        app_state.relay.as_ref(),
        &tenant,
        id,
        task_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), task)))
}

/// DELETE a Task specified by its id.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = String, Path, description = "Task id to delete")
    ),
    responses(
        (status = 204, description = "Successfully deleted a certain Task by its id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Task not found"),
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
    debug!("DELETE Task by id: {id}");

    TaskApi::delete(app_state.db_conn_ref(), app_state.relay.as_ref(), &tenant, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
