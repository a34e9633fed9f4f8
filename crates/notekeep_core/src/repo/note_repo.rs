//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist note rows and answer ownership lookups.
//! - Provide the owned-or-collaborated listing used by note overviews.
//!
//! # Invariants
//! - `owner` is written once at insert and never updated.
//! - Mutations report `NotFound` when zero rows are affected.
//! - Listing joins `collaborations` and groups by note id, so a note with
//!   several collaborators appears once.
//! - Tags persist as a JSON array in `notes.tags`.

use crate::db::DbPool;
use crate::error::EntityRef;
use crate::model::ids::{AccountId, NoteId};
use crate::model::note::{Note, NotePayload};
use crate::repo::{is_foreign_key_violation, RepoError, RepoResult};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

const NOTE_COLUMNS_SQL: &str = "notes.id,
    notes.title,
    notes.body,
    notes.tags,
    notes.owner,
    notes.created_at,
    notes.updated_at";

/// Insert model for one note.
#[derive(Debug, Clone, Copy)]
pub struct NewNoteRecord<'a> {
    pub id: &'a NoteId,
    pub payload: &'a NotePayload,
    pub owner: &'a AccountId,
}

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Inserts one note. Returns the id echoed back by the store, if any.
    fn insert_note(&self, record: NewNoteRecord<'_>) -> RepoResult<Option<NoteId>>;
    /// Gets one note joined with its owner's username.
    fn get_note(&self, id: &NoteId) -> RepoResult<Option<Note>>;
    /// Replaces title/body/tags and refreshes `updated_at`.
    fn update_note(&self, id: &NoteId, payload: &NotePayload) -> RepoResult<()>;
    fn delete_note(&self, id: &NoteId) -> RepoResult<()>;
    /// Notes owned by `actor` plus notes `actor` collaborates on.
    fn list_accessible(&self, actor: &AccountId) -> RepoResult<Vec<Note>>;
    fn owner_of(&self, id: &NoteId) -> RepoResult<Option<AccountId>>;
}

/// SQLite-backed note repository over the shared pool.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    pool: DbPool,
}

impl SqliteNoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl NoteRepository for SqliteNoteRepository {
    fn insert_note(&self, record: NewNoteRecord<'_>) -> RepoResult<Option<NoteId>> {
        let tags = encode_tags(&record.payload.tags)?;
        let conn = self.pool.get()?;
        let inserted: Option<String> = conn
            .query_row(
                "INSERT INTO notes (id, title, body, tags, owner)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id;",
                params![
                    record.id.as_str(),
                    record.payload.title.as_str(),
                    record.payload.body.as_str(),
                    tags,
                    record.owner.as_str(),
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::MissingReference(EntityRef::Account(record.owner.clone()))
                } else {
                    RepoError::from(err)
                }
            })?;

        Ok(inserted.map(NoteId::from))
    }

    fn get_note(&self, id: &NoteId) -> RepoResult<Option<Note>> {
        let conn = self.pool.get()?;
        let note = conn
            .query_row(
                &format!(
                    "SELECT {NOTE_COLUMNS_SQL}, accounts.username AS owner_username
                     FROM notes
                     LEFT JOIN accounts ON accounts.id = notes.owner
                     WHERE notes.id = ?1;"
                ),
                [id.as_str()],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn update_note(&self, id: &NoteId, payload: &NotePayload) -> RepoResult<()> {
        let tags = encode_tags(&payload.tags)?;
        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                body = ?3,
                tags = ?4,
                updated_at = MAX(updated_at, strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id.as_str(), payload.title.as_str(), payload.body.as_str(), tags],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Note(id.clone())));
        }

        Ok(())
    }

    fn delete_note(&self, id: &NoteId) -> RepoResult<()> {
        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Note(id.clone())));
        }

        Ok(())
    }

    fn list_accessible(&self, actor: &AccountId) -> RepoResult<Vec<Note>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS_SQL}, NULL AS owner_username
             FROM notes
             LEFT JOIN collaborations ON collaborations.note_id = notes.id
             WHERE notes.owner = ?1 OR collaborations.user_id = ?1
             GROUP BY notes.id
             ORDER BY notes.updated_at DESC, notes.id ASC;"
        ))?;
        let notes = stmt
            .query_map([actor.as_str()], parse_note_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn owner_of(&self, id: &NoteId) -> RepoResult<Option<AccountId>> {
        let conn = self.pool.get()?;
        let owner: Option<String> = conn
            .query_row("SELECT owner FROM notes WHERE id = ?1;", [id.as_str()], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(owner.map(AccountId::from))
    }
}

fn encode_tags(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode note tags: {err}")))
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let tags_text: String = row.get("tags")?;
    let tags: Vec<String> = serde_json::from_str(&tags_text).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(err))
    })?;

    Ok(Note {
        id: NoteId::from(row.get::<_, String>("id")?),
        title: row.get("title")?,
        body: row.get("body")?,
        tags,
        owner: AccountId::from(row.get::<_, String>("owner")?),
        owner_username: row.get("owner_username")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
