//! Request and response types for `/api/static-pages`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::languages::types::LanguageResponse;
use crate::posts::types::{AuthorSummary, ContentStatus};
use crate::slug::is_valid_slug;
use crate::validation::{len_between, optional, Validator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaticPageRequest {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub language_id: Uuid,
}

impl CreateStaticPageRequest {
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
pub struct UpdateStaticPageRequest {
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
}

impl UpdateStaticPageRequest {
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
pub struct StaticPageResponse {
    pub id: Uuid,
    pub slug: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub title: String,
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPageDetailResponse {
    #[serde(flatten)]
    pub page: StaticPageResponse,
    pub content: String,
}

/// Admin view: a page with every translation, each tagged with its
/// language row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStaticPageResponse {
    pub id: Uuid,
    pub slug: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub translations: Vec<StaticPageTranslationResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticPageTranslationResponse {
    pub language: LanguageResponse,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}
