//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL text and row mapping from service orchestration.
//!
//! # Invariants
//! - Every call checks out one pooled connection and releases it on return.
//! - Store-level constraint violations are translated into semantic errors
//!   (`Conflict`, `MissingReference`) instead of leaking SQLite codes.

use crate::db::DbError;
use crate::error::EntityRef;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod collaboration_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Target row does not exist (zero rows affected).
    NotFound(EntityRef),
    /// UNIQUE constraint rejected the write.
    Conflict(&'static str),
    /// FOREIGN KEY constraint rejected the write.
    MissingReference(EntityRef),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(entity) => write!(f, "{entity} not found"),
            Self::Conflict(what) => write!(f, "{what} already exists"),
            Self::MissingReference(entity) => write!(f, "referenced {entity} does not exist"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<r2d2::Error> for RepoError {
    fn from(value: r2d2::Error) -> Self {
        Self::Db(DbError::Pool(value))
    }
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    has_extended_code(err, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
}

pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    has_extended_code(err, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

fn has_extended_code(err: &rusqlite::Error, code: std::os::raw::c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(failure, _) if failure.extended_code == code)
}
