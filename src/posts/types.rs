//! Request and response types for `/api/posts`.
//!
//! `AuthorSummary`, `CategorySummary` and `TagSummary` are the denormalized
//! projections embedded across list/detail responses; comments, categories
//! and tags reuse them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comments::types::CommentThreadResponse;
use crate::error::ApiError;
use crate::slug::is_valid_slug;
use crate::validation::{len_between, optional, Validator};

/// Publication lifecycle shared by posts and static pages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    /// Parse a query/body value like `"PUBLISHED"`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(Self::Draft),
            "PUBLISHED" => Some(Self::Published),
            "ARCHIVED" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

/// Author projection with bio, used by the posts-by-author endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummary {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    pub status: Option<ContentStatus>,
    pub language_id: Uuid,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "title",
            len_between(&self.title, 1, 200),
            "Title must be 1-200 characters",
        );
        v.check("content", !self.content.is_empty(), "Content is required");
        v.check(
            "slug",
            optional(self.slug.as_deref(), is_valid_slug),
            "Slug must be lowercase, alphanumeric and hyphens only",
        );
        v.check(
            "excerpt",
            optional(self.excerpt.as_deref(), |s| len_between(s, 0, 500)),
            "Excerpt must be max 500 characters",
        );
        v.check(
            "metaTitle",
            optional(self.meta_title.as_deref(), |s| len_between(s, 0, 200)),
            "Meta title must be max 200 characters",
        );
        v.check(
            "metaDescription",
            optional(self.meta_description.as_deref(), |s| len_between(s, 0, 300)),
            "Meta description must be max 300 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub slug: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<ContentStatus>,
    pub category_id: Option<Uuid>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "slug",
            optional(self.slug.as_deref(), is_valid_slug),
            "Slug must be lowercase, alphanumeric and hyphens only",
        );
        v.finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItemResponse {
    pub id: Uuid,
    pub slug: String,
    pub featured_image: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub category: Option<CategorySummary>,
    pub tags: Vec<TagSummary>,
    pub title: String,
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostListItemResponse,
    pub content: String,
    pub comments: Vec<CommentThreadResponse>,
}

/// Compact post shape used by popular/recent listings, category and tag
/// detail views and the posts-by-author endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummaryResponse {
    pub id: Uuid,
    pub slug: String,
    pub featured_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub like_count: i64,
    pub author: AuthorSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
    pub title: String,
    pub excerpt: Option<String>,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AuthorPostsResponse {
    pub author: AuthorProfile,
    pub posts: Vec<PostSummaryResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub like_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_param() {
        assert_eq!(ContentStatus::from_param("DRAFT"), Some(ContentStatus::Draft));
        assert_eq!(
            ContentStatus::from_param("PUBLISHED"),
            Some(ContentStatus::Published)
        );
        assert_eq!(ContentStatus::from_param("ALL"), None);
        assert_eq!(ContentStatus::from_param("published"), None);
    }

    #[test]
    fn test_create_post_request_validation() {
        let request = CreatePostRequest {
            title: String::new(),
            slug: Some("Not A Slug".to_string()),
            content: String::new(),
            excerpt: None,
            meta_title: None,
            meta_description: None,
            featured_image: None,
            category_id: None,
            tag_ids: Vec::new(),
            status: None,
            language_id: Uuid::new_v4(),
        };
        match request.validate().unwrap_err() {
            ApiError::Validation { errors, .. } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "content", "slug"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
