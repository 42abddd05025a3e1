use crate::controller::ApiResponse;
use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::organization as OrganizationApi;
use log::*;

/// GET the organization the caller's session is active in
#[utoipa::path(
    get,
    path = "/organization",
    responses(
        (status = 200, description = "Successfully retrieved the current Organization", body = [domain::organizations::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn read(
    AuthenticatedUser(tenant): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET current Organization {}", tenant.organization_id());

    let organization = OrganizationApi::find_current(app_state.db_conn_ref(), &tenant).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), organization)))
}
