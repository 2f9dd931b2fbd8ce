//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SurrealDB enforces no string lengths itself, so every CRUD handler and
//! workflow action validates through these before writing.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, vendor, leave type, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, instructions (transition notes, follow-ups, etc.)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, tracking number, courier, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_required_text_fails() {
        assert!(validate_required_text("", "note", MAX_NOTE_LEN).is_err());
        assert!(validate_required_text("   ", "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn overlong_text_fails() {
        let long = "x".repeat(MAX_NOTE_LEN + 1);
        assert!(validate_required_text(&long, "note", MAX_NOTE_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn normal_text_passes() {
        assert!(validate_required_text("move to prepress", "note", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
    }
}
