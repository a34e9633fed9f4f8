//! Collaboration registry backed by the `collaborations` relation.
//!
//! # Responsibility
//! - Grant and revoke collaborator access to notes.
//! - Serve as the default `CollaborationDelegate` for the access controller.
//!
//! # Invariants
//! - Callers guard grant/revoke with `AccessController::authorize_owner`.
//! - Storage failures while answering `is_collaborator` surface as
//!   `DelegateFailure`, never as `Denied`.

use crate::access::delegate::{CollaborationAccess, CollaborationDelegate, DelegateFailure};
use crate::error::{CoreError, CoreResult};
use crate::model::ids::{AccountId, CollaborationId, NoteId};
use crate::repo::collaboration_repo::CollaborationRepository;
use log::info;

pub struct CollaborationRegistry<R: CollaborationRepository> {
    repo: R,
}

impl<R: CollaborationRepository> CollaborationRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Grants `user_id` collaborator access to `note_id`.
    ///
    /// # Errors
    /// - `Conflict("collaboration")` when the pair already exists.
    /// - `NotFound` when the note or the user does not exist.
    pub fn add_collaborator(
        &self,
        note_id: &NoteId,
        user_id: &AccountId,
    ) -> CoreResult<CollaborationId> {
        let id = CollaborationId::generate();
        let inserted = self.repo.insert_collaboration(&id, note_id, user_id)?;
        if inserted.as_ref() != Some(&id) {
            return Err(CoreError::StorageInvariant(
                "collaboration insert was not confirmed by the store",
            ));
        }

        info!(
            "event=collaboration_add module=collaborations status=ok note_id={} user_id={}",
            note_id, user_id
        );
        Ok(id)
    }

    /// Revokes collaborator access; `NotFound` when no such grant exists.
    pub fn remove_collaborator(&self, note_id: &NoteId, user_id: &AccountId) -> CoreResult<()> {
        self.repo.delete_collaboration(note_id, user_id)?;
        info!(
            "event=collaboration_remove module=collaborations status=ok note_id={} user_id={}",
            note_id, user_id
        );
        Ok(())
    }
}

impl<R: CollaborationRepository> CollaborationDelegate for CollaborationRegistry<R> {
    fn is_collaborator(
        &self,
        note_id: &NoteId,
        actor_id: &AccountId,
    ) -> Result<CollaborationAccess, DelegateFailure> {
        match self.repo.collaboration_exists(note_id, actor_id) {
            Ok(true) => Ok(CollaborationAccess::Granted),
            Ok(false) => Ok(CollaborationAccess::Denied),
            Err(err) => Err(DelegateFailure::new(err.to_string())),
        }
    }
}
