//! The caller's authorization scope.
//!
//! A `Tenant` can only be obtained by resolving a session, so every
//! organization id that reaches a mutation or a subscription came from an
//! authenticated session rather than from client input.

use crate::error::{EntityErrorKind, Error};
use crate::Id;
use entity_api::{organization_member, session};
use sea_orm::DatabaseConnection;

use log::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tenant {
    user_id: Id,
    organization_id: Id,
}

impl Tenant {
    pub(crate) fn new(user_id: Id, organization_id: Id) -> Self {
        Self {
            user_id,
            organization_id,
        }
    }

    pub fn user_id(&self) -> Id {
        self.user_id
    }

    pub fn organization_id(&self) -> Id {
        self.organization_id
    }
}

/// Resolves a bearer token into the tenant it acts for.
///
/// The session must be unexpired and its user must still be a member of the
/// session's organization.
pub async fn authenticate(db: &DatabaseConnection, token: &str) -> Result<Tenant, Error> {
    let session = session::find_active_by_token(db, token).await?;

    match organization_member::find(db, session.organization_id, session.user_id).await? {
        Some(_) => Ok(Tenant::new(session.user_id, session.organization_id)),
        None => {
            warn!(
                "User {} holds a session for organization {} without membership",
                session.user_id, session.organization_id
            );
            Err(Error::entity(EntityErrorKind::Unauthenticated))
        }
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity_api::{organization_members, roles::Role, sessions};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn session(user_id: Id, organization_id: Id) -> sessions::Model {
        let now = chrono::Utc::now();
        sessions::Model {
            token: "token".to_owned(),
            user_id,
            organization_id,
            expires_at: (now + chrono::Duration::hours(1)).into(),
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn authenticate_binds_the_session_organization() -> Result<(), Error> {
        let user_id = Id::new_v4();
        let organization_id = Id::new_v4();
        let now = chrono::Utc::now();
        let membership = organization_members::Model {
            id: Id::new_v4(),
            organization_id,
            user_id,
            role: Role::Member,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![session(user_id, organization_id)]])
            .append_query_results(vec![vec![membership]])
            .into_connection();

        let tenant = authenticate(&db, "token").await?;

        assert_eq!(tenant.user_id(), user_id);
        assert_eq!(tenant.organization_id(), organization_id);
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_rejects_a_session_without_membership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![session(Id::new_v4(), Id::new_v4())]])
            .append_query_results(vec![Vec::<organization_members::Model>::new()])
            .into_connection();

        let error = authenticate(&db, "token").await.unwrap_err();

        assert_eq!(error.entity_kind(), &EntityErrorKind::Unauthenticated);
    }
}
