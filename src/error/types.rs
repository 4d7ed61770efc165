//! API error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::validation::FieldError;

/// All failure modes a handler can produce.
///
/// The mapping to HTTP status codes lives in [`ApiError::status_code`];
/// conversion into the response envelope lives in `error::conversion`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input. Carries field-level detail when the
    /// failure came from request validation.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// No principal, or an invalid/expired token.
    #[error("{message}")]
    Authentication { message: String },

    /// Principal authenticated but lacks the required role or ownership.
    #[error("{message}")]
    Authorization { message: String },

    /// The addressed resource does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// A unique constraint (slug, email, language code) would be violated.
    #[error("{message}")]
    Conflict { message: String },

    /// Delete blocked by existing references.
    #[error("{message}")]
    Dependency { message: String },

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Anything else unexpected.
    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn validation_fields(errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: "Validation failed".to_string(),
            errors,
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status for this error.
    ///
    /// Unique-constraint conflicts and blocked deletes answer 400, matching
    /// the API's observable contract.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } | Self::Dependency { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Authentication { .. } => StatusCode::UNAUTHORIZED,
            Self::Authorization { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to clients. Internal detail is never leaked; it is
    /// logged by the response conversion instead.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal(format!("password hashing failed: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::internal(format!("token handling failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::authentication("no token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::authorization("no role").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("absent").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("dup").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::dependency("referenced").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = ApiError::internal("secret database detail");
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = ApiError::conflict("Slug already exists");
        assert_eq!(err.public_message(), "Slug already exists");
    }
}
