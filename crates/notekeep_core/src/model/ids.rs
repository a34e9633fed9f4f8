//! Opaque string identifiers.
//!
//! Generated ids carry a readable kind prefix (`user-`, `note-`, `collab-`)
//! followed by a random v4 token. Ids read back from storage or supplied by
//! callers are accepted verbatim.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh, never-reused identifier.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }
    };
}

opaque_id!(
    /// Account identifier.
    AccountId,
    "user"
);
opaque_id!(
    /// Note identifier.
    NoteId,
    "note"
);
opaque_id!(
    /// Collaboration row identifier.
    CollaborationId,
    "collab"
);

#[cfg(test)]
mod tests {
    use super::{AccountId, NoteId};

    #[test]
    fn generated_ids_carry_kind_prefix_and_are_unique() {
        let first = AccountId::generate();
        let second = AccountId::generate();
        assert!(first.as_str().starts_with("user-"));
        assert!(NoteId::generate().as_str().starts_with("note-"));
        assert_ne!(first, second);
    }

    #[test]
    fn external_ids_are_kept_verbatim() {
        let id = NoteId::from("note-missing");
        assert_eq!(id.to_string(), "note-missing");
    }
}
