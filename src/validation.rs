//! Presence rules shared by every payload validator.
//!
//! A field counts as present when it was supplied as a non-empty string. Values are
//! passed through untouched: no trimming, no case folding, no coercion.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid data")]
    Incomplete,
    #[error("email and password are required")]
    MissingCredentials,
    #[error("invalid page")]
    InvalidPage,
}

/// Keeps a field only if it carries a non-empty value.
pub fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

/// Full validation: every field must be present.
pub fn require<const N: usize>(
    fields: [Option<String>; N],
) -> Result<[String; N], ValidationError> {
    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = present(field).ok_or(ValidationError::Incomplete)?;
    }
    Ok(out)
}

/// Partial validation: at least one field must be present.
pub fn require_any(fields: &[&Option<String>]) -> Result<(), ValidationError> {
    if fields.iter().any(|f| f.as_deref().is_some_and(|v| !v.is_empty())) {
        Ok(())
    } else {
        Err(ValidationError::Incomplete)
    }
}
