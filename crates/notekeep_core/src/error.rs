//! Service-level error vocabulary.
//!
//! # Invariants
//! - `NotFound` and `Authorization` stay distinct end to end (existence vs
//!   permission).
//! - `Authentication` carries no detail; unknown user and wrong password are
//!   indistinguishable.
//! - Collaboration delegate internals never appear in any variant.

use crate::model::ids::{AccountId, NoteId};
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Entity referenced by a `NotFound` error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Account(AccountId),
    Note(NoteId),
    Collaboration { note_id: NoteId, user_id: AccountId },
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account {id}"),
            Self::Note(id) => write!(f, "note {id}"),
            Self::Collaboration { note_id, user_id } => {
                write!(f, "collaboration of {user_id} on {note_id}")
            }
        }
    }
}

/// Coarse error classification for callers mapping to response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Authentication,
    Authorization,
    StorageInvariant,
    CollaborationUnavailable,
    Storage,
    PasswordHash,
}

#[derive(Debug)]
pub enum CoreError {
    /// Malformed or out-of-range input.
    Validation(ValidationError),
    /// Uniqueness violation reported by the store, e.g. `username`.
    Conflict(&'static str),
    NotFound(EntityRef),
    /// Credentials did not establish an identity.
    Authentication,
    /// Identity established but the note is off limits.
    Authorization(NoteId),
    /// Store acknowledged a write that its read-back cannot confirm.
    StorageInvariant(&'static str),
    /// Collaboration delegate could not answer.
    CollaborationUnavailable(NoteId),
    /// Transient storage failure, propagated unmodified.
    Storage(RepoError),
    PasswordHash(argon2::password_hash::Error),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Authentication => ErrorKind::Authentication,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::StorageInvariant(_) => ErrorKind::StorageInvariant,
            Self::CollaborationUnavailable(_) => ErrorKind::CollaborationUnavailable,
            Self::Storage(_) => ErrorKind::Storage,
            Self::PasswordHash(_) => ErrorKind::PasswordHash,
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid input: {err}"),
            Self::Conflict(what) => write!(f, "{what} already exists"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Authentication => write!(f, "invalid credentials"),
            Self::Authorization(note_id) => {
                write!(f, "not allowed to access note {note_id}")
            }
            Self::StorageInvariant(details) => write!(f, "storage invariant violated: {details}"),
            Self::CollaborationUnavailable(note_id) => {
                write!(f, "collaboration check unavailable for note {note_id}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::PasswordHash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::PasswordHash(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(entity) | RepoError::MissingReference(entity) => {
                Self::NotFound(entity)
            }
            RepoError::Conflict(what) => Self::Conflict(what),
            other => Self::Storage(other),
        }
    }
}

impl From<argon2::password_hash::Error> for CoreError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::PasswordHash(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreError, EntityRef, ErrorKind};
    use crate::model::ids::NoteId;
    use crate::repo::RepoError;

    #[test]
    fn missing_note_and_forbidden_note_have_distinct_kinds() {
        let missing = CoreError::NotFound(EntityRef::Note(NoteId::from("note-a")));
        let forbidden = CoreError::Authorization(NoteId::from("note-a"));
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(forbidden.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn repo_conflict_maps_to_conflict() {
        let err = CoreError::from(RepoError::Conflict("username"));
        assert!(matches!(err, CoreError::Conflict("username")));
        assert_eq!(err.to_string(), "username already exists");
    }
}
