//! HTTP handlers for `/api/tags`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::UserRole;
use crate::error::ApiError;
use crate::languages;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::Locale;
use crate::posts;
use crate::posts::db::{PostFilter, PostSort};
use crate::posts::types::ContentStatus;
use crate::response::{ApiResponse, UNTITLED};
use crate::slug::{generate_slug, is_valid_slug};
use crate::tags::db::{self, NewTag, Tag, TagRecord};
use crate::tags::types::{
    CreateTagRequest, PopularQuery, TagDetailResponse, TagResponse, UpdateTagRequest,
};

fn tag_response(record: TagRecord) -> TagResponse {
    TagResponse {
        id: record.id,
        slug: record.slug,
        color: record.color,
        created_at: record.created_at,
        updated_at: record.updated_at,
        name: record.name.unwrap_or_else(|| UNTITLED.to_string()),
        post_count: record.post_count,
    }
}

fn created_response(tag: Tag, name: String) -> TagResponse {
    TagResponse {
        id: tag.id,
        slug: tag.slug,
        color: tag.color,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
        name,
        post_count: 0,
    }
}

pub async fn get_tags(
    State(pool): State<PgPool>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let records = db::list(&pool, language_id).await?;
    let data: Vec<TagResponse> = records.into_iter().map(tag_response).collect();
    Ok(ApiResponse::ok("Tags retrieved successfully", data))
}

/// Tags ordered by referencing-post count.
pub async fn get_popular_tags(
    State(pool): State<PgPool>,
    locale: Locale,
    Query(query): Query<PopularQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let records = db::popular(&pool, language_id, limit).await?;
    let data: Vec<TagResponse> = records.into_iter().map(tag_response).collect();
    Ok(ApiResponse::ok("Popular tags retrieved successfully", data))
}

/// Tag detail with up to ten recent published posts.
pub async fn get_tag_by_slug(
    State(pool): State<PgPool>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;

    let record = db::find_record_by_slug(&pool, &slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    let filter = PostFilter {
        language_id,
        status: Some(ContentStatus::Published),
        tag_slug: Some(record.slug.clone()),
        sort: PostSort::PublishedAt,
        limit: 10,
        offset: 0,
        ..Default::default()
    };
    let recent = posts::db::list(&pool, &filter, true).await?;

    let data = TagDetailResponse {
        tag: tag_response(record),
        recent_posts: recent
            .into_iter()
            .map(|record| posts::handlers::post_summary(record, false))
            .collect(),
    };

    Ok(ApiResponse::ok("Tag retrieved successfully", data))
}

pub async fn create_tag(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreateTagRequest>,
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
        .unwrap_or_else(|| generate_slug(&request.name));
    if !is_valid_slug(&slug) {
        return Err(ApiError::validation(
            "Slug must be lowercase, alphanumeric and hyphens only",
        ));
    }
    if db::slug_exists(&pool, &slug).await? {
        return Err(ApiError::conflict("Slug already exists"));
    }

    let tag = db::insert(
        &pool,
        NewTag {
            slug,
            color: request.color,
            language_id: request.language_id,
            name: request.name.clone(),
        },
    )
    .await?;
    tracing::info!("tag created: {}", tag.slug);

    Ok(ApiResponse::created(
        "Tag created successfully",
        created_response(tag, request.name),
    ))
}

pub async fn update_tag(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    request.validate()?;

    let existing = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    if let Some(slug) = &request.slug {
        if slug != &existing.slug && db::slug_exists(&pool, slug).await? {
            return Err(ApiError::conflict("Slug already exists"));
        }
    }

    let tag = db::update(&pool, id, request.slug, request.color).await?;

    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let record = db::find_record_by_slug(&pool, &tag.slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    Ok(ApiResponse::ok("Tag updated successfully", tag_response(record)))
}

/// Delete a tag. Admin-only, blocked while posts reference it.
pub async fn delete_tag(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let tag = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Tag not found"))?;

    if db::post_count(&pool, id).await? > 0 {
        return Err(ApiError::dependency(
            "Cannot delete tag with posts. Please remove tag from posts first.",
        ));
    }

    db::delete(&pool, id).await?;
    tracing::info!("tag deleted: {}", tag.slug);

    Ok(ApiResponse::message("Tag deleted successfully"))
}
