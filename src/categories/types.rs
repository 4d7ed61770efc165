//! Request and response types for `/api/categories`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::types::PostSummaryResponse;
use crate::slug::is_valid_slug;
use crate::validation::{is_valid_hex_color, len_between, optional, Validator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub language_id: Uuid,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check("name", len_between(&self.name, 1, 100), "Name must be 1-100 characters");
        v.check(
            "slug",
            optional(self.slug.as_deref(), is_valid_slug),
            "Slug must be lowercase, alphanumeric and hyphens only",
        );
        v.check(
            "description",
            optional(self.description.as_deref(), |s| len_between(s, 0, 500)),
            "Description must be max 500 characters",
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
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub slug: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCategoryRequest {
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub post_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub recent_posts: Vec<PostSummaryResponse>,
}
