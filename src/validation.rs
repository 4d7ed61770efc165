//! Request validation helpers.
//!
//! Each request type implements a `validate` method that collects
//! field-level errors through a [`Validator`]. Validation runs before any
//! database work so malformed input never reaches the query layer.

use serde::Serialize;

use crate::error::ApiError;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects field errors and converts them into a validation failure.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless `ok` holds.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError {
                field: field.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    /// Fail with a 400 and the collected field errors, if any.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_fields(self.errors))
        }
    }
}

/// Minimal email shape check: a single `@` with non-empty sides.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Usernames: 3-20 characters, alphanumerics and underscores.
pub fn is_valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Hex colors in `#rrggbb` form.
pub fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// An optional field is valid when absent.
pub fn optional(value: Option<&str>, check: impl Fn(&str) -> bool) -> bool {
    value.map(check).unwrap_or(true)
}

/// Length check on character count.
pub fn len_between(value: &str, min: usize, max: usize) -> bool {
    let n = value.chars().count();
    (min..=max).contains(&n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a.b.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@"));
    }

    #[test]
    fn test_usernames() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("user_42"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username(&"x".repeat(21)));
    }

    #[test]
    fn test_hex_colors() {
        assert!(is_valid_hex_color("#a1B2c3"));
        assert!(!is_valid_hex_color("a1B2c3"));
        assert!(!is_valid_hex_color("#a1B2c"));
        assert!(!is_valid_hex_color("#a1B2cz"));
    }

    #[test]
    fn test_validator_collects_fields() {
        let mut v = Validator::new();
        v.check("email", false, "Valid email is required");
        v.check("password", true, "unused");
        v.check("username", false, "Username is required");
        let err = v.finish().unwrap_err();
        match err {
            ApiError::Validation { errors, .. } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "email");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
