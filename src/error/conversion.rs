//! Error-to-response conversion.
//!
//! Implements `IntoResponse` for [`ApiError`] so handlers can bubble errors
//! with `?`. The response body mirrors the success envelope with
//! `success: false`, plus an `errors` array for validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("request rejected ({}): {self}", status.as_u16());
        }

        let mut body = serde_json::json!({
            "success": false,
            "message": self.public_message(),
        });
        if let ApiError::Validation { errors, .. } = &self {
            if !errors.is_empty() {
                body["errors"] = serde_json::json!(errors);
            }
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn test_validation_response_includes_fields() {
        let err = ApiError::validation_fields(vec![FieldError {
            field: "email".to_string(),
            message: "Valid email is required".to_string(),
        }]);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_response_status() {
        let response = ApiError::not_found("Post not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
