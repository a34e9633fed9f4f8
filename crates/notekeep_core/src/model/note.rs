//! Note domain model.
//!
//! # Invariants
//! - Every note has exactly one owner referencing an existing account.
//! - `owner` never changes after creation.
//! - `updated_at >= created_at`, both in epoch milliseconds.

use crate::model::ids::{AccountId, NoteId};
use crate::model::validation::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    /// Tags in caller-supplied order.
    pub tags: Vec<String>,
    pub owner: AccountId,
    /// Owner's username; populated by single-note reads only.
    pub owner_username: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Writable note fields for create and full-replacement update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl NotePayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("title", &self.title)?;
        require_non_blank("body", &self.body)?;
        for (index, tag) in self.tags.iter().enumerate() {
            if tag.trim().is_empty() {
                return Err(ValidationError::BlankTag { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::NotePayload;
    use crate::model::validation::ValidationError;

    #[test]
    fn empty_tag_list_is_valid() {
        NotePayload::new("Title", "Body", Vec::new())
            .validate()
            .expect("tags are optional");
    }

    #[test]
    fn rejects_blank_title_and_body() {
        let err = NotePayload::new(" ", "Body", Vec::new()).validate().unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "title" });

        let err = NotePayload::new("Title", "", Vec::new()).validate().unwrap_err();
        assert_eq!(err, ValidationError::Blank { field: "body" });
    }

    #[test]
    fn reports_position_of_blank_tag() {
        let payload = NotePayload::new("Title", "Body", vec!["work".to_string(), "  ".to_string()]);
        assert_eq!(
            payload.validate().unwrap_err(),
            ValidationError::BlankTag { index: 1 }
        );
    }
}
