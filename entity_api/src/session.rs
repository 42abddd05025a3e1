use super::error::Error;
use entity::sessions::{Column, Entity, Model};
use sea_orm::{entity::prelude::*, DatabaseConnection};

use log::*;

/// Resolves a bearer token to an unexpired session.
///
/// Unknown and expired tokens are indistinguishable to the caller: both are
/// `RecordUnauthenticated`.
pub async fn find_active_by_token(db: &DatabaseConnection, token: &str) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let session = Entity::find()
        .filter(Column::Token.eq(token))
        .one(db)
        .await?
        .ok_or_else(Error::unauthenticated)?;

    if session.expires_at <= now {
        debug!("Session for user {} expired at {}", session.user_id, session.expires_at);
        return Err(Error::unauthenticated());
    }

    Ok(session)
}
