//! Request and response types for `/api/languages`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::languages::db::Language;
use crate::middleware::locale::SUPPORTED_LANGUAGES;
use crate::validation::{len_between, Validator};

#[derive(Debug, Deserialize)]
pub struct LanguageListQuery {
    /// Only active languages when true (the default).
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLanguageRequest {
    pub code: String,
    pub name: String,
    pub native_name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl CreateLanguageRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "code",
            SUPPORTED_LANGUAGES.contains(&self.code.to_lowercase().as_str()),
            "Code must be one of the supported locales",
        );
        v.check("name", len_between(&self.name, 1, 100), "Name must be 1-100 characters");
        v.check(
            "nativeName",
            len_between(&self.native_name, 1, 100),
            "Native name must be 1-100 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLanguageRequest {
    pub name: Option<String>,
    pub native_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
}

impl UpdateLanguageRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "name",
            self.name.as_deref().map(|s| len_between(s, 1, 100)).unwrap_or(true),
            "Name must be 1-100 characters",
        );
        v.check(
            "nativeName",
            self.native_name
                .as_deref()
                .map(|s| len_between(s, 1, 100))
                .unwrap_or(true),
            "Native name must be 1-100 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_active: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Language> for LanguageResponse {
    fn from(language: Language) -> Self {
        Self {
            id: language.id,
            code: language.code,
            name: language.name,
            native_name: language.native_name,
            is_active: language.is_active,
            is_default: language.is_default,
            created_at: language.created_at,
            updated_at: language.updated_at,
        }
    }
}

/// Per-language translation counts for the admin stats view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStatsResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_active: bool,
    pub is_default: bool,
    pub stats: TranslationCounts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCounts {
    pub posts: i64,
    pub categories: i64,
    pub tags: i64,
    pub static_pages: i64,
}
