//! JSON response envelope.
//!
//! Every endpoint answers with the same `{success, message, data?,
//! pagination?}` shape. Handlers build envelopes through the constructors
//! here; error responses use the same shape via `error::conversion`.

use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

/// Fallback title/name used when no translation row exists for the
/// requested language. Applied only at the response-shaping edge; query
/// functions return `Option` and never invent text.
pub const UNTITLED: &str = "Untitled";

/// Pagination block included in list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let limit = limit.max(1);
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 envelope with data.
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: None,
        })
    }

    /// 200 envelope with data and pagination.
    pub fn ok_paginated(
        message: impl Into<String>,
        data: T,
        pagination: Pagination,
    ) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
            pagination: Some(pagination),
        })
    }

    /// 201 envelope with data.
    pub fn created(message: impl Into<String>, data: T) -> (StatusCode, Json<Self>) {
        (
            StatusCode::CREATED,
            Json(Self {
                success: true,
                message: message.into(),
                data: Some(data),
                pagination: None,
            }),
        )
    }
}

impl ApiResponse<()> {
    /// 200 envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
            pagination: None,
        })
    }
}

/// Normalize pagination query parameters into `(page, limit, offset)`.
///
/// Pages start at 1; limits are clamped to 1..=100.
pub fn page_window(page: Option<i64>, limit: Option<i64>, default_limit: i64) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, 100);
    (page, limit, (page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None, 10), (1, 10, 0));
        assert_eq!(page_window(Some(3), Some(20), 10), (3, 20, 40));
        assert_eq!(page_window(Some(0), Some(1000), 10), (1, 100, 0));
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let body = serde_json::to_value(ApiResponse::<()>::message("done").0).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": true, "message": "done"})
        );
    }
}
