//! Account domain model.
//!
//! # Responsibility
//! - Define the public account view and the registration input.
//! - Enforce registration field limits.
//!
//! # Invariants
//! - `Account` never exposes the stored password hash.
//! - Account fields are immutable after registration.

use crate::model::ids::AccountId;
use crate::model::validation::{
    require_max_chars, require_min_chars, require_non_blank, ValidationError,
};
use serde::{Deserialize, Serialize};

pub const USERNAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const FULLNAME_MAX_CHARS: usize = 100;

/// Public identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub fullname: String,
}

/// Registration input, checked by `validate` before any hashing or storage.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub fullname: &'a str,
}

// Keeps the plaintext password out of debug output.
impl std::fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("fullname", &self.fullname)
            .finish()
    }
}

impl Registration<'_> {
    /// Checks presence first, then length limits, field by field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("username", self.username)?;
        require_non_blank("password", self.password)?;
        require_non_blank("fullname", self.fullname)?;

        require_max_chars("username", self.username, USERNAME_MAX_CHARS)?;
        require_min_chars("password", self.password, PASSWORD_MIN_CHARS)?;
        require_max_chars("fullname", self.fullname, FULLNAME_MAX_CHARS)?;
        Ok(())
    }
}
