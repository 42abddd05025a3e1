use crate::extractors::RejectionType;
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use domain::{error::EntityErrorKind, tenant, Tenant};
use log::*;

/// The caller's tenant, resolved from the `Authorization: Bearer` session token.
pub(crate) struct AuthenticatedUser(pub Tenant);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = RejectionType;

    async fn from_request_parts(
        parts: &mut Parts,
        app_state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

        match tenant::authenticate(app_state.db_conn_ref(), token).await {
            Ok(tenant) => {
                trace!(
                    "Authenticated user {} in organization {}",
                    tenant.user_id(),
                    tenant.organization_id()
                );
                Ok(AuthenticatedUser(tenant))
            }
            Err(e) => match e.entity_kind() {
                EntityErrorKind::Unauthenticated | EntityErrorKind::NotFound => {
                    Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
                }
                _ => {
                    error!("Failed to resolve session: {e:?}");
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal Server Error".to_string(),
                    ))
                }
            },
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
