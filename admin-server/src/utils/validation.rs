//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so handlers check here.

use shared::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Person and entity names
pub const MAX_NAME_LEN: usize = 200;

/// Order titles
pub const MAX_TITLE_LEN: usize = 500;

/// Notes, reasons, short descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, national id, currency, status names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Order descriptions, requirements, message bodies
pub const MAX_LONG_TEXT_LEN: usize = 10_000;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
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
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate a monetary amount: finite, and `> 0` or `>= 0` depending on `strict`.
pub fn validate_amount(value: f64, field: &str, strict: bool) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{field} must be a finite number")));
    }
    if strict && value <= 0.0 {
        return Err(AppError::validation(format!("{field} must be positive, got {value}")));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Optional variant of [`validate_amount`] (non-strict)
pub fn validate_optional_amount(value: Option<f64>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) => validate_amount(v, field, false),
        None => Ok(()),
    }
}

/// Minimal shape check: one `@` with text on both sides, no whitespace.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation(format!("invalid email address: {value}"))
            .with_detail("field", "email"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Essay", "title", MAX_TITLE_LEN).is_ok());
        let err = validate_required_text("   ", "title", MAX_TITLE_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(validate_required_text(&"x".repeat(501), "title", MAX_TITLE_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(501)), "notes", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(0.0, "amount", false).is_ok());
        assert!(validate_amount(0.0, "amount", true).is_err());
        assert!(validate_amount(-1.0, "amount", false).is_err());
        assert!(validate_amount(f64::NAN, "amount", false).is_err());
        assert!(validate_optional_amount(Some(f64::INFINITY), "price").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.example.com").is_err());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("ja ne@example.com").is_err());
    }
}
