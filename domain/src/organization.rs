use crate::error::Error;
use crate::organizations::Model;
use crate::Tenant;
use entity_api::organization;
use sea_orm::DatabaseConnection;

/// The organization the caller's session is acting within.
pub async fn find_current(db: &DatabaseConnection, tenant: &Tenant) -> Result<Model, Error> {
    Ok(organization::find_by_id(db, tenant.organization_id()).await?)
}
