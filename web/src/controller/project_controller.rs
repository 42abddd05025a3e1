use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{project as ProjectApi, projects::Model, task as TaskApi, Id};
use log::*;

/// POST create a new Project in the caller's organization
#[utoipa::path(
    post,
    path = "/projects",
    request_body = domain::projects::Model,
    responses(
        (status = 201, description = "Successfully Created a New Project", body = [domain::projects::Model]),
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
    Json(project_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Project from: {project_model:?}");

    let project = ProjectApi::create(app_state.db_conn_ref(), &tenant, project_model).await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), project)))
}

/// GET all Projects in the caller's organization
#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "Successfully retrieved all Projects", body = [domain::projects::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn index(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Projects for organization {}", tenant.organization_id());

    let projects = ProjectApi::find_by_organization(app_state.db_conn_ref(), &tenant).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), projects)))
}

/// GET all Tasks in a Project
#[utoipa::path(
    get,
    path = "/projects/{id}/tasks",
    params(
        ("id" = String, Path, description = "Project id whose tasks to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all Tasks in the Project", body = [domain::tasks::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn tasks(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Tasks for Project {project_id}");

    let tasks = TaskApi::find_by_project(app_state.db_conn_ref(), &tenant, project_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tasks)))
}
