//! Note ownership registry.
//!
//! # Responsibility
//! - Create, read, replace and delete note records.
//! - Answer "who owns this note" without judging the caller.
//!
//! # Invariants
//! - Payloads are validated before storage is touched.
//! - A create whose id the store does not echo back is a
//!   `StorageInvariant` failure, never a silent success.
//! - Authorization is the caller's job; see `access::AccessController`.

use crate::error::{CoreError, CoreResult, EntityRef};
use crate::model::ids::{AccountId, NoteId};
use crate::model::note::{Note, NotePayload};
use crate::repo::note_repo::{NewNoteRecord, NoteRepository};
use log::{error, info};

/// Note use-case service over a note repository.
pub struct NoteOwnershipRegistry<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteOwnershipRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by `owner` and returns its id.
    ///
    /// # Errors
    /// - `Validation` for blank title/body/tags.
    /// - `NotFound(Account)` when `owner` does not exist.
    /// - `StorageInvariant` when the insert is not confirmed.
    pub fn create(&self, payload: &NotePayload, owner: &AccountId) -> CoreResult<NoteId> {
        payload.validate()?;

        let id = NoteId::generate();
        let inserted = self.repo.insert_note(NewNoteRecord {
            id: &id,
            payload,
            owner,
        })?;

        if inserted.as_ref() != Some(&id) {
            error!(
                "event=note_create module=notes status=error error_code=insert_unconfirmed note_id={}",
                id
            );
            return Err(CoreError::StorageInvariant(
                "note insert was not confirmed by the store",
            ));
        }

        info!(
            "event=note_create module=notes status=ok note_id={} owner={}",
            id, owner
        );
        Ok(id)
    }

    /// Gets one note, including its owner's username.
    pub fn get(&self, id: &NoteId) -> CoreResult<Note> {
        self.repo
            .get_note(id)?
            .ok_or_else(|| CoreError::NotFound(EntityRef::Note(id.clone())))
    }

    /// Replaces title/body/tags and refreshes the update timestamp.
    pub fn update(&self, id: &NoteId, payload: &NotePayload) -> CoreResult<()> {
        payload.validate()?;
        self.repo.update_note(id, payload)?;
        info!("event=note_update module=notes status=ok note_id={}", id);
        Ok(())
    }

    /// Deletes one note; its collaborations go with it.
    pub fn delete(&self, id: &NoteId) -> CoreResult<()> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=notes status=ok note_id={}", id);
        Ok(())
    }

    /// Notes owned by `actor` plus notes shared with `actor`, one entry each.
    pub fn list_accessible(&self, actor: &AccountId) -> CoreResult<Vec<Note>> {
        Ok(self.repo.list_accessible(actor)?)
    }

    /// Returns the owner of `id`.
    ///
    /// # Errors
    /// - `NotFound(Note)` when the note does not exist.
    pub fn owner_of(&self, id: &NoteId) -> CoreResult<AccountId> {
        self.repo
            .owner_of(id)?
            .ok_or_else(|| CoreError::NotFound(EntityRef::Note(id.clone())))
    }
}
