//! HTTP handlers for `/api/languages`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::UserRole;
use crate::error::ApiError;
use crate::languages::db::{self, LanguageChanges, NewLanguage};
use crate::languages::types::{
    CreateLanguageRequest, LanguageListQuery, LanguageResponse, LanguageStatsResponse,
    TranslationCounts, UpdateLanguageRequest,
};
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;

/// List languages, by default only active ones (`?active=false` lists all).
pub async fn list_languages(
    State(pool): State<PgPool>,
    Query(query): Query<LanguageListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let languages = db::list(&pool, query.active.unwrap_or(true)).await?;
    let data: Vec<LanguageResponse> = languages.into_iter().map(Into::into).collect();
    Ok(ApiResponse::ok("Languages retrieved successfully", data))
}

pub async fn get_language_by_code(
    State(pool): State<PgPool>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let language = db::find_by_code(&pool, &code.to_uppercase())
        .await?
        .ok_or_else(|| ApiError::not_found("Language not found"))?;
    Ok(ApiResponse::ok(
        "Language retrieved successfully",
        LanguageResponse::from(language),
    ))
}

pub async fn get_default_language(
    State(pool): State<PgPool>,
) -> Result<impl IntoResponse, ApiError> {
    let language = db::find_default(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Default language not found"))?;
    Ok(ApiResponse::ok(
        "Default language retrieved successfully",
        LanguageResponse::from(language),
    ))
}

/// Create a language. When `isDefault` is set the previous default is
/// unset in the same transaction.
pub async fn create_language(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreateLanguageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;
    request.validate()?;

    let code = request.code.to_uppercase();
    if db::find_by_code(&pool, &code).await?.is_some() {
        return Err(ApiError::conflict("Language code already exists"));
    }

    let language = db::insert(
        &pool,
        NewLanguage {
            code,
            name: request.name,
            native_name: request.native_name,
            is_default: request.is_default,
        },
    )
    .await?;
    tracing::info!("language created: {}", language.code);

    Ok(ApiResponse::created(
        "Language created successfully",
        LanguageResponse::from(language),
    ))
}

pub async fn update_language(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLanguageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;
    request.validate()?;

    if db::find_by_id(&pool, id).await?.is_none() {
        return Err(ApiError::not_found("Language not found"));
    }

    let language = db::update(
        &pool,
        id,
        LanguageChanges {
            name: request.name,
            native_name: request.native_name,
            is_active: request.is_active,
            is_default: request.is_default,
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        "Language updated successfully",
        LanguageResponse::from(language),
    ))
}

/// Delete a language. Blocked for the default language and for any language
/// still referenced by a translation row.
pub async fn delete_language(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let language = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Language not found"))?;

    if language.is_default {
        return Err(ApiError::dependency("Cannot delete default language"));
    }
    if db::reference_counts(&pool, id).await?.total() > 0 {
        return Err(ApiError::dependency(
            "Cannot delete language with translations. Please remove all translations first.",
        ));
    }

    db::delete(&pool, id).await?;
    tracing::info!("language deleted: {}", language.code);

    Ok(ApiResponse::message("Language deleted successfully"))
}

pub async fn set_default_language(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let language = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Language not found"))?;

    if !language.is_active {
        return Err(ApiError::validation(
            "Cannot set inactive language as default",
        ));
    }

    let language = db::set_default(&pool, id).await?;
    tracing::info!("default language set to {}", language.code);

    Ok(ApiResponse::ok(
        "Default language updated successfully",
        LanguageResponse::from(language),
    ))
}

pub async fn toggle_language_status(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let language = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Language not found"))?;

    if language.is_default && language.is_active {
        return Err(ApiError::validation("Cannot deactivate default language"));
    }

    let language = db::set_active(&pool, id, !language.is_active).await?;
    let message = if language.is_active {
        "Language activated successfully"
    } else {
        "Language deactivated successfully"
    };

    Ok(ApiResponse::ok(message, LanguageResponse::from(language)))
}

pub async fn get_language_stats(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;

    let stats = db::stats(&pool).await?;
    let data: Vec<LanguageStatsResponse> = stats
        .into_iter()
        .map(|(language, counts)| LanguageStatsResponse {
            id: language.id,
            code: language.code,
            name: language.name,
            native_name: language.native_name,
            is_active: language.is_active,
            is_default: language.is_default,
            stats: TranslationCounts {
                posts: counts.posts,
                categories: counts.categories,
                tags: counts.tags,
                static_pages: counts.static_pages,
            },
        })
        .collect();

    Ok(ApiResponse::ok(
        "Language statistics retrieved successfully",
        data,
    ))
}
