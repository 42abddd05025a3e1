use crate::error::Error;
use crate::projects::Model;
use crate::Tenant;
use entity_api::project;
use sea_orm::DatabaseConnection;

const MAX_NAME_LEN: usize = 120;

pub async fn create(
    db: &DatabaseConnection,
    tenant: &Tenant,
    project_model: Model,
) -> Result<Model, Error> {
    let name = project_model.name.trim();
    if name.is_empty() {
        return Err(Error::invalid("project name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::invalid(format!(
            "project name must be at most {MAX_NAME_LEN} characters"
        )));
    }

    let project_model = Model {
        name: name.to_owned(),
        ..project_model
    };

    Ok(project::create(db, tenant.organization_id(), project_model).await?)
}

pub async fn find_by_organization(
    db: &DatabaseConnection,
    tenant: &Tenant,
) -> Result<Vec<Model>, Error> {
    Ok(project::find_by_organization(db, tenant.organization_id()).await?)
}
