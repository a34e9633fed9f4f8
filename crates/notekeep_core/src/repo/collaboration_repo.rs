//! Collaboration relation repository and SQLite implementation.
//!
//! # Invariants
//! - A (note, user) pair appears at most once.
//! - Rows disappear with their note (`ON DELETE CASCADE`).

use crate::db::{DbPool, PooledConn};
use crate::error::EntityRef;
use crate::model::ids::{AccountId, CollaborationId, NoteId};
use crate::repo::{is_foreign_key_violation, is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension};

/// Repository interface for the collaboration relation.
pub trait CollaborationRepository {
    /// Inserts one pair. Returns the id echoed back by the store, if any.
    fn insert_collaboration(
        &self,
        id: &CollaborationId,
        note_id: &NoteId,
        user_id: &AccountId,
    ) -> RepoResult<Option<CollaborationId>>;
    fn delete_collaboration(&self, note_id: &NoteId, user_id: &AccountId) -> RepoResult<()>;
    fn collaboration_exists(&self, note_id: &NoteId, user_id: &AccountId) -> RepoResult<bool>;
}

#[derive(Clone)]
pub struct SqliteCollaborationRepository {
    pool: DbPool,
}

impl SqliteCollaborationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CollaborationRepository for SqliteCollaborationRepository {
    fn insert_collaboration(
        &self,
        id: &CollaborationId,
        note_id: &NoteId,
        user_id: &AccountId,
    ) -> RepoResult<Option<CollaborationId>> {
        let conn = self.pool.get()?;
        let result = conn
            .query_row(
                "INSERT INTO collaborations (id, note_id, user_id)
                 VALUES (?1, ?2, ?3)
                 RETURNING id;",
                params![id.as_str(), note_id.as_str(), user_id.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional();

        match result {
            Ok(inserted) => Ok(inserted.map(CollaborationId::from)),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict("collaboration")),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(RepoError::MissingReference(missing_reference(
                    &conn, note_id, user_id,
                )?))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_collaboration(&self, note_id: &NoteId, user_id: &AccountId) -> RepoResult<()> {
        let conn = self.pool.get()?;
        let changed = conn.execute(
            "DELETE FROM collaborations WHERE note_id = ?1 AND user_id = ?2;",
            params![note_id.as_str(), user_id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Collaboration {
                note_id: note_id.clone(),
                user_id: user_id.clone(),
            }));
        }

        Ok(())
    }

    fn collaboration_exists(&self, note_id: &NoteId, user_id: &AccountId) -> RepoResult<bool> {
        let conn = self.pool.get()?;
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM collaborations
                WHERE note_id = ?1 AND user_id = ?2
            );",
            params![note_id.as_str(), user_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

// SQLite does not say which foreign key failed; probe the note first.
fn missing_reference(
    conn: &PooledConn,
    note_id: &NoteId,
    user_id: &AccountId,
) -> RepoResult<EntityRef> {
    let note_exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1);",
        [note_id.as_str()],
        |row| row.get(0),
    )?;

    if note_exists == 1 {
        Ok(EntityRef::Account(user_id.clone()))
    } else {
        Ok(EntityRef::Note(note_id.clone()))
    }
}
