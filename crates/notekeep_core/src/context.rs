//! Core bootstrap and dependency wiring.
//!
//! # Responsibility
//! - Turn one `CoreConfig` into a ready pool, repositories and services.
//! - Inject the collaboration delegate into the access controller.
//!
//! # Invariants
//! - Config is validated before logging or storage is touched.
//! - Every service shares the same bounded connection pool.

use crate::access::{AccessController, CollaborationDelegate};
use crate::config::{ConfigError, CoreConfig};
use crate::db::{open_pool, DbError, DbPool};
use crate::logging::{init_logging, LoggingError};
use crate::repo::account_repo::SqliteAccountRepository;
use crate::repo::collaboration_repo::SqliteCollaborationRepository;
use crate::repo::note_repo::SqliteNoteRepository;
use crate::service::collaboration_service::CollaborationRegistry;
use crate::service::credential_store::CredentialStore;
use crate::service::note_registry::NoteOwnershipRegistry;
use crate::service::password::CredentialHasher;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type SqliteNoteRegistry = NoteOwnershipRegistry<SqliteNoteRepository>;
pub type SqliteCollaborationRegistry = CollaborationRegistry<SqliteCollaborationRepository>;
pub type SharedDelegate = Arc<dyn CollaborationDelegate + Send + Sync>;
pub type CoreAccessController = AccessController<Arc<SqliteNoteRegistry>, SharedDelegate>;

#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Logging(LoggingError),
    Db(DbError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for BootstrapError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for BootstrapError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<DbError> for BootstrapError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Fully wired core services over one SQLite database.
pub struct CoreContext {
    pool: DbPool,
    credentials: CredentialStore<SqliteAccountRepository>,
    notes: Arc<SqliteNoteRegistry>,
    collaborations: Arc<SqliteCollaborationRegistry>,
    access: CoreAccessController,
}

impl CoreContext {
    /// Opens the core with the SQLite collaboration registry as delegate.
    pub fn open(config: &CoreConfig) -> Result<Self, BootstrapError> {
        Self::build(config, None)
    }

    /// Opens the core with a caller-supplied collaboration delegate.
    pub fn open_with_delegate(
        config: &CoreConfig,
        delegate: SharedDelegate,
    ) -> Result<Self, BootstrapError> {
        Self::build(config, Some(delegate))
    }

    fn build(config: &CoreConfig, delegate: Option<SharedDelegate>) -> Result<Self, BootstrapError> {
        config.validate()?;
        if let Some(dir) = config.logging.dir.as_deref() {
            init_logging(&config.logging.level, dir)?;
        }

        let hasher = CredentialHasher::new(config.password_hash)?;
        let pool = open_pool(&config.database)?;

        let credentials =
            CredentialStore::new(SqliteAccountRepository::new(pool.clone()), hasher);
        let notes = Arc::new(NoteOwnershipRegistry::new(SqliteNoteRepository::new(
            pool.clone(),
        )));
        let collaborations = Arc::new(CollaborationRegistry::new(
            SqliteCollaborationRepository::new(pool.clone()),
        ));
        let delegate: SharedDelegate = match delegate {
            Some(delegate) => delegate,
            None => collaborations.clone() as SharedDelegate,
        };
        let access = AccessController::new(Arc::clone(&notes), delegate);

        Ok(Self {
            pool,
            credentials,
            notes,
            collaborations,
            access,
        })
    }

    pub fn credentials(&self) -> &CredentialStore<SqliteAccountRepository> {
        &self.credentials
    }

    pub fn notes(&self) -> &SqliteNoteRegistry {
        &self.notes
    }

    pub fn collaborations(&self) -> &SqliteCollaborationRegistry {
        &self.collaborations
    }

    pub fn access(&self) -> &CoreAccessController {
        &self.access
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
