//! HTTP handlers for `/api/categories`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::UserRole;
use crate::categories::db::{self, Category, CategoryChanges, CategoryRecord, NewCategory};
use crate::categories::types::{
    CategoryDetailResponse, CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest,
};
use crate::error::ApiError;
use crate::languages;
use crate::middleware::auth::AuthUser;
use crate::middleware::locale::Locale;
use crate::posts;
use crate::posts::db::{PostFilter, PostSort};
use crate::posts::types::ContentStatus;
use crate::response::{ApiResponse, UNTITLED};
use crate::slug::{generate_slug, is_valid_slug};

fn category_response(record: CategoryRecord) -> CategoryResponse {
    CategoryResponse {
        id: record.id,
        slug: record.slug,
        color: record.color,
        icon: record.icon,
        is_active: record.is_active,
        created_at: record.created_at,
        updated_at: record.updated_at,
        name: record.name.unwrap_or_else(|| UNTITLED.to_string()),
        description: record.description,
        post_count: record.post_count,
    }
}

/// Response for create/update, shaped from the bare row plus the
/// translation fields we just wrote.
fn created_response(category: Category, name: String, description: Option<String>) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        slug: category.slug,
        color: category.color,
        icon: category.icon,
        is_active: category.is_active,
        created_at: category.created_at,
        updated_at: category.updated_at,
        name,
        description,
        post_count: 0,
    }
}

/// Active categories with locale-resolved names and post counts.
pub async fn get_categories(
    State(pool): State<PgPool>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let records = db::list(&pool, language_id).await?;
    let data: Vec<CategoryResponse> = records.into_iter().map(category_response).collect();
    Ok(ApiResponse::ok("Categories retrieved successfully", data))
}

/// Category detail with up to ten recent published posts.
pub async fn get_category_by_slug(
    State(pool): State<PgPool>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;

    let record = db::find_record_by_slug(&pool, &slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    let filter = PostFilter {
        language_id,
        status: Some(ContentStatus::Published),
        category_slug: Some(record.slug.clone()),
        sort: PostSort::PublishedAt,
        limit: 10,
        offset: 0,
        ..Default::default()
    };
    let recent = posts::db::list(&pool, &filter, true).await?;

    let data = CategoryDetailResponse {
        category: category_response(record),
        recent_posts: recent
            .into_iter()
            .map(|record| posts::handlers::post_summary(record, false))
            .collect(),
    };

    Ok(ApiResponse::ok("Category retrieved successfully", data))
}

pub async fn create_category(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreateCategoryRequest>,
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

    let category = db::insert(
        &pool,
        NewCategory {
            slug,
            color: request.color,
            icon: request.icon,
            language_id: request.language_id,
            name: request.name.clone(),
            description: request.description.clone(),
        },
    )
    .await?;
    tracing::info!("category created: {}", category.slug);

    Ok(ApiResponse::created(
        "Category created successfully",
        created_response(category, request.name, request.description),
    ))
}

pub async fn update_category(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    request.validate()?;

    let existing = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    if let Some(slug) = &request.slug {
        if slug != &existing.slug && db::slug_exists(&pool, slug).await? {
            return Err(ApiError::conflict("Slug already exists"));
        }
    }

    let category = db::update(
        &pool,
        id,
        CategoryChanges {
            slug: request.slug,
            color: request.color,
            icon: request.icon,
            is_active: request.is_active,
        },
    )
    .await?;

    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let record = db::find_record_by_slug(&pool, &category.slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(ApiResponse::ok(
        "Category updated successfully",
        category_response(record),
    ))
}

/// Delete a category. Admin-only, blocked while posts reference it.
pub async fn delete_category(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let category = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    if db::post_count(&pool, id).await? > 0 {
        return Err(ApiError::dependency(
            "Cannot delete category with posts. Please move or delete posts first.",
        ));
    }

    db::delete(&pool, id).await?;
    tracing::info!("category deleted: {}", category.slug);

    Ok(ApiResponse::message("Category deleted successfully"))
}
