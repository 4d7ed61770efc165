//! HTTP handlers for `/api/static-pages`.
//!
//! Public routes only expose published pages; the `/admin` routes show all
//! statuses and, for the detail view, every translation.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::UserRole;
use crate::error::ApiError;
use crate::languages;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::Locale;
use crate::pages::db::{self, NewStaticPage, PageRecord};
use crate::pages::types::{
    AdminStaticPageResponse, CreateStaticPageRequest, StaticPageDetailResponse,
    StaticPageResponse, StaticPageTranslationResponse, UpdateStaticPageRequest,
};
use crate::posts::types::ContentStatus;
use crate::response::{ApiResponse, UNTITLED};
use crate::slug::{generate_slug, is_valid_slug};

fn page_response(record: PageRecord) -> StaticPageResponse {
    StaticPageResponse {
        id: record.id,
        slug: record.slug,
        status: record.status,
        created_at: record.created_at,
        updated_at: record.updated_at,
        author: record.author,
        title: record.title.unwrap_or_else(|| UNTITLED.to_string()),
        excerpt: record.excerpt,
        meta_title: record.meta_title,
        meta_description: record.meta_description,
    }
}

/// Published pages, locale-resolved.
pub async fn get_static_pages(
    State(pool): State<PgPool>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let records = db::list(&pool, language_id, true).await?;
    let data: Vec<StaticPageResponse> = records.into_iter().map(page_response).collect();
    Ok(ApiResponse::ok("Static pages retrieved successfully", data))
}

/// Page detail by slug. Unpublished pages are invisible here: 404.
pub async fn get_static_page_by_slug(
    State(pool): State<PgPool>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;

    let mut record = db::find_record_by_slug(&pool, &slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Static page not found"))?;

    if record.status != ContentStatus::Published {
        return Err(ApiError::not_found("Static page not found"));
    }

    let content = record.content.take().unwrap_or_default();
    let data = StaticPageDetailResponse {
        page: page_response(record),
        content,
    };

    Ok(ApiResponse::ok("Static page retrieved successfully", data))
}

/// Admin listing: every page regardless of status.
pub async fn get_all_static_pages(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;

    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let records = db::list(&pool, language_id, false).await?;
    let data: Vec<StaticPageResponse> = records.into_iter().map(page_response).collect();
    Ok(ApiResponse::ok(
        "All static pages retrieved successfully",
        data,
    ))
}

/// Admin detail: one page with all of its translations.
pub async fn get_static_page_by_id(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;

    let page = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Static page not found"))?;

    let author = db::author_summary(&pool, page.author_id).await?;
    let translations = db::translations(&pool, page.id).await?;

    let data = AdminStaticPageResponse {
        id: page.id,
        slug: page.slug,
        status: page.status,
        created_at: page.created_at,
        updated_at: page.updated_at,
        author,
        translations: translations
            .into_iter()
            .map(|t| StaticPageTranslationResponse {
                language: t.language.into(),
                title: t.title,
                content: t.content,
                excerpt: t.excerpt,
                meta_title: t.meta_title,
                meta_description: t.meta_description,
            })
            .collect(),
    };

    Ok(ApiResponse::ok("Static page retrieved successfully", data))
}

pub async fn create_static_page(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreateStaticPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    request.validate()?;

    if languages::db::find_by_id(&pool, request.language_id)
        .await?
        .is_none()
    {
        return Err(ApiError::validation("Language not found"));
    }

    let slug = request
        .slug
        .clone()
        .unwrap_or_else(|| generate_slug(&request.title));
    if !is_valid_slug(&slug) {
        return Err(ApiError::validation(
            "Slug must be lowercase, alphanumeric and hyphens only",
        ));
    }
    if db::slug_exists(&pool, &slug).await? {
        return Err(ApiError::conflict("Slug already exists"));
    }

    let page = db::insert(
        &pool,
        NewStaticPage {
            slug,
            status: request.status.unwrap_or(ContentStatus::Draft),
            author_id: principal.id,
            language_id: request.language_id,
            title: request.title,
            content: request.content,
            excerpt: request.excerpt,
            meta_title: request.meta_title,
            meta_description: request.meta_description,
        },
    )
    .await?;
    tracing::info!("static page created: {}", page.slug);

    let record = db::find_record_by_slug(&pool, &page.slug, Some(request.language_id))
        .await?
        .ok_or_else(|| ApiError::internal("created page vanished"))?;

    Ok(ApiResponse::created(
        "Static page created successfully",
        page_response(record),
    ))
}

pub async fn update_static_page(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStaticPageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    request.validate()?;

    let existing = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Static page not found"))?;

    if let Some(slug) = &request.slug {
        if slug != &existing.slug && db::slug_exists(&pool, slug).await? {
            return Err(ApiError::conflict("Slug already exists"));
        }
    }

    let page = db::update(&pool, id, request.slug, request.status).await?;

    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let record = db::find_record_by_slug(&pool, &page.slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Static page not found"))?;

    Ok(ApiResponse::ok(
        "Static page updated successfully",
        page_response(record),
    ))
}

pub async fn delete_static_page(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let page = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Static page not found"))?;

    db::delete(&pool, id).await?;
    tracing::info!("static page deleted: {}", page.slug);

    Ok(ApiResponse::message("Static page deleted successfully"))
}
