//! Request and response types for `/api/tags`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::types::PostSummaryResponse;
use crate::slug::is_valid_slug;
use crate::validation::{is_valid_hex_color, len_between, optional, Validator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub language_id: Uuid,
}

impl CreateTagRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check("name", len_between(&self.name, 1, 50), "Name must be 1-50 characters");
        v.check(
            "slug",
            optional(self.slug.as_deref(), is_valid_slug),
            "Slug must be lowercase, alphanumeric and hyphens only",
        );
        v.check(
            "color",
            optional(self.color.as_deref(), is_valid_hex_color),
            "Color must be a valid hex color",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub slug: Option<String>,
    pub color: Option<String>,
}

impl UpdateTagRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "slug",
            optional(self.slug.as_deref(), is_valid_slug),
            "Slug must be lowercase, alphanumeric and hyphens only",
        );
        v.check(
            "color",
            optional(self.color.as_deref(), is_valid_hex_color),
            "Color must be a valid hex color",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub post_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDetailResponse {
    #[serde(flatten)]
    pub tag: TagResponse,
    pub recent_posts: Vec<PostSummaryResponse>,
}
