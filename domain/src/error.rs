//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` depends on `domain` but never directly on `entity_api`,
/// so every entity error is translated here before it reaches a handler.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
}

/// Entity errors reduced to the subset a caller can act on.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    /// Missing, or belongs to another organization
    NotFound,
    /// Rejected before any write; carries a reason fit for the caller
    Invalid(String),
    Unauthenticated,
    /// Visible to the caller but not theirs to change
    Forbidden,
    DbTransaction,
}

impl Error {
    pub(crate) fn entity(kind: EntityErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::entity(EntityErrorKind::Invalid(reason.into()))
    }

    /// The entity-level kind the error was classified as.
    pub fn entity_kind(&self) -> &EntityErrorKind {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(kind)) => kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {:?}", self.error_kind)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match &err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::RecordUnauthenticated => EntityErrorKind::Unauthenticated,
            EntityApiErrorKind::RecordNotUpdated | EntityApiErrorKind::SystemError => {
                EntityErrorKind::DbTransaction
            }
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_translates_to_not_found() {
        let error: Error = EntityApiError::not_found().into();

        assert_eq!(error.entity_kind(), &EntityErrorKind::NotFound);
        assert!(error.source().is_some());
    }

    #[test]
    fn expired_sessions_translate_to_unauthenticated() {
        let error: Error = EntityApiError::unauthenticated().into();

        assert_eq!(error.entity_kind(), &EntityErrorKind::Unauthenticated);
    }

    #[test]
    fn database_failures_translate_to_db_transaction() {
        let error: Error = EntityApiError::from(sea_orm::DbErr::Custom("down".to_string())).into();

        assert_eq!(error.entity_kind(), &EntityErrorKind::DbTransaction);
    }

    #[test]
    fn invalid_carries_the_reason() {
        let error = Error::invalid("task title is required");

        assert_eq!(
            error.entity_kind(),
            &EntityErrorKind::Invalid("task title is required".to_string())
        );
        assert!(error.source().is_none());
    }
}
