//! Collaboration capability consumed by the access controller.

use crate::model::ids::{AccountId, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Answer from a collaboration delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaborationAccess {
    Granted,
    Denied,
}

/// The delegate could not produce an answer (store unreachable, etc).
///
/// The message is for logs only and never reaches authorization callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateFailure {
    message: String,
}

impl DelegateFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for DelegateFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "collaboration delegate failure: {}", self.message)
    }
}

impl Error for DelegateFailure {}

/// Decides whether a non-owner has delegated access to a note.
pub trait CollaborationDelegate {
    fn is_collaborator(
        &self,
        note_id: &NoteId,
        actor_id: &AccountId,
    ) -> Result<CollaborationAccess, DelegateFailure>;
}

impl<T: CollaborationDelegate + ?Sized> CollaborationDelegate for Arc<T> {
    fn is_collaborator(
        &self,
        note_id: &NoteId,
        actor_id: &AccountId,
    ) -> Result<CollaborationAccess, DelegateFailure> {
        (**self).is_collaborator(note_id, actor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::DelegateFailure;

    #[test]
    fn failure_keeps_raw_message_for_logs() {
        let failure = DelegateFailure::new("no such table: collaborations");
        assert_eq!(failure.message(), "no such table: collaborations");
        assert_eq!(
            failure.to_string(),
            "collaboration delegate failure: no such table: collaborations"
        );
    }
}
