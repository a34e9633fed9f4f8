//! Owner-first, collaboration-fallback authorization.
//!
//! # Invariants
//! - Order is fixed: ownership lookup, owner shortcut, delegate fallback.
//! - `Denied` from the delegate becomes `CoreError::Authorization` for the
//!   note; the delegate's own vocabulary never leaks.
//! - A delegate that cannot answer yields `CollaborationUnavailable`, so an
//!   outage is not reported as a permission denial.

use crate::access::delegate::{CollaborationAccess, CollaborationDelegate};
use crate::error::{CoreError, CoreResult};
use crate::model::ids::{AccountId, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_registry::NoteOwnershipRegistry;
use log::{debug, warn};
use std::sync::Arc;

/// Ownership source for authorization decisions.
pub trait OwnershipLookup {
    /// Returns the note owner, or `CoreError::NotFound` for unknown notes.
    fn owner_of(&self, note_id: &NoteId) -> CoreResult<AccountId>;
}

impl<R: NoteRepository> OwnershipLookup for NoteOwnershipRegistry<R> {
    fn owner_of(&self, note_id: &NoteId) -> CoreResult<AccountId> {
        NoteOwnershipRegistry::owner_of(self, note_id)
    }
}

impl<T: OwnershipLookup + ?Sized> OwnershipLookup for Arc<T> {
    fn owner_of(&self, note_id: &NoteId) -> CoreResult<AccountId> {
        (**self).owner_of(note_id)
    }
}

/// Which rule granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    Owner,
    Collaborator,
}

/// Authorization guard for note operations.
pub struct AccessController<O, D> {
    ownership: O,
    delegate: D,
}

impl<O: OwnershipLookup, D: CollaborationDelegate> AccessController<O, D> {
    pub fn new(ownership: O, delegate: D) -> Self {
        Self {
            ownership,
            delegate,
        }
    }

    /// Authorizes `actor_id` to act on `note_id` as owner or collaborator.
    ///
    /// # Errors
    /// - `NotFound(Note)` when the note does not exist, for any actor.
    /// - `Authorization` when the actor is neither owner nor collaborator.
    /// - `CollaborationUnavailable` when the delegate cannot answer.
    pub fn authorize(&self, note_id: &NoteId, actor_id: &AccountId) -> CoreResult<AccessGrant> {
        let owner = self.ownership.owner_of(note_id)?;
        if &owner == actor_id {
            return Ok(AccessGrant::Owner);
        }

        match self.delegate.is_collaborator(note_id, actor_id) {
            Ok(CollaborationAccess::Granted) => Ok(AccessGrant::Collaborator),
            Ok(CollaborationAccess::Denied) => {
                debug!(
                    "event=note_authorize module=access status=denied note_id={} actor={}",
                    note_id, actor_id
                );
                Err(CoreError::Authorization(note_id.clone()))
            }
            Err(failure) => {
                warn!(
                    "event=note_authorize module=access status=error error_code=delegate_failed note_id={} error={}",
                    note_id,
                    failure.message()
                );
                Err(CoreError::CollaborationUnavailable(note_id.clone()))
            }
        }
    }

    /// Owner-only guard for deletion and collaborator management.
    ///
    /// Never consults the delegate.
    pub fn authorize_owner(&self, note_id: &NoteId, actor_id: &AccountId) -> CoreResult<()> {
        let owner = self.ownership.owner_of(note_id)?;
        if &owner != actor_id {
            debug!(
                "event=note_authorize_owner module=access status=denied note_id={} actor={}",
                note_id, actor_id
            );
            return Err(CoreError::Authorization(note_id.clone()));
        }
        Ok(())
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }
}
