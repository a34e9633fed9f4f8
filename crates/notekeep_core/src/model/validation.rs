//! Input validation errors and field checks.
//!
//! Lengths are counted in Unicode scalar values, not bytes.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Caller-fixable input problem. Always raised before storage is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty or whitespace only.
    Blank { field: &'static str },
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    TooShort {
        field: &'static str,
        min_chars: usize,
    },
    /// One entry of a tag list is blank.
    BlankTag { index: usize },
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } | Self::TooShort { field, .. } => {
                field
            }
            Self::BlankTag { .. } => "tags",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must not exceed {max_chars} characters")
            }
            Self::TooShort { field, min_chars } => {
                write!(f, "{field} must be at least {min_chars} characters")
            }
            Self::BlankTag { index } => write!(f, "tag at position {index} must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::TooLong { field, max_chars });
    }
    Ok(())
}

pub(crate) fn require_min_chars(
    field: &'static str,
    value: &str,
    min_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min_chars {
        return Err(ValidationError::TooShort { field, min_chars });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_max_chars, require_min_chars, require_non_blank, ValidationError};

    #[test]
    fn blank_detection_trims_whitespace() {
        assert_eq!(
            require_non_blank("title", " \t\n"),
            Err(ValidationError::Blank { field: "title" })
        );
        assert!(require_non_blank("title", " x ").is_ok());
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        let accented = "é".repeat(50);
        assert!(require_max_chars("username", &accented, 50).is_ok());
        assert!(require_min_chars("password", "ééééé", 6).is_err());
    }
}
