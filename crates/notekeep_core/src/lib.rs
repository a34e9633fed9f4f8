//! Access-control and identity core for notekeep.
//! This crate is the single source of truth for account and note
//! authorization invariants.

pub mod access;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use access::{
    AccessController, AccessGrant, CollaborationAccess, CollaborationDelegate, DelegateFailure,
    OwnershipLookup,
};
pub use config::{ConfigError, CoreConfig, DatabaseConfig, LoggingConfig, PasswordHashConfig};
pub use context::{BootstrapError, CoreContext, SharedDelegate};
pub use error::{CoreError, CoreResult, EntityRef, ErrorKind};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::account::Account;
pub use model::ids::{AccountId, CollaborationId, NoteId};
pub use model::note::{Note, NotePayload};
pub use model::validation::ValidationError;
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::collaboration_repo::{CollaborationRepository, SqliteCollaborationRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult};
pub use service::collaboration_service::CollaborationRegistry;
pub use service::credential_store::CredentialStore;
pub use service::note_registry::NoteOwnershipRegistry;
pub use service::password::CredentialHasher;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
