//! HTTP handlers for `/api/posts`.
//!
//! One canonical controller: listing and detail are public (restricted to
//! published posts unless the caller is a moderator), create/update require
//! moderator, delete requires admin and is blocked while comments exist.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::{self, UserRole};
use crate::categories;
use crate::comments;
use crate::error::ApiError;
use crate::languages;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::middleware::locale::Locale;
use crate::posts::db::{
    self, CategoryJoin, NewPost, NewPostTranslation, PostChanges, PostFilter, PostRecord,
    PostSort, TagJoin,
};
use crate::posts::types::{
    AuthorPostsResponse, AuthorProfile, CategorySummary, ContentStatus, CreatePostRequest,
    LikeResponse, LimitQuery, PageQuery, PostDetailResponse, PostListItemResponse, PostListQuery,
    PostSummaryResponse, TagSummary, UpdatePostRequest,
};
use crate::response::{page_window, ApiResponse, Pagination, UNTITLED};
use crate::slug::{extract_excerpt, generate_slug, is_valid_slug, reading_time};
use crate::tags;

pub(crate) fn category_summary(join: CategoryJoin) -> CategorySummary {
    CategorySummary {
        id: join.id,
        slug: join.slug,
        name: join.name.unwrap_or_else(|| UNTITLED.to_string()),
        description: join.description,
        color: join.color,
        icon: join.icon,
    }
}

pub(crate) fn tag_summary(join: TagJoin) -> TagSummary {
    TagSummary {
        id: join.id,
        slug: join.slug,
        name: join.name.unwrap_or_else(|| UNTITLED.to_string()),
        color: join.color,
    }
}

pub(crate) fn group_tags(joins: Vec<TagJoin>) -> HashMap<Uuid, Vec<TagSummary>> {
    let mut map: HashMap<Uuid, Vec<TagSummary>> = HashMap::new();
    for join in joins {
        map.entry(join.post_id).or_default().push(tag_summary(join));
    }
    map
}

fn list_item(record: PostRecord, tags: Vec<TagSummary>) -> PostListItemResponse {
    PostListItemResponse {
        id: record.id,
        slug: record.slug,
        featured_image: record.featured_image,
        status: record.status,
        published_at: record.published_at,
        read_time: record.read_time,
        view_count: record.view_count,
        like_count: record.like_count,
        created_at: record.created_at,
        updated_at: record.updated_at,
        author: record.author,
        category: record.category.map(category_summary),
        tags,
        title: record.title.unwrap_or_else(|| UNTITLED.to_string()),
        excerpt: record.excerpt,
        meta_title: record.meta_title,
        meta_description: record.meta_description,
        comment_count: record.comment_count,
    }
}

pub(crate) fn post_summary(record: PostRecord, include_category: bool) -> PostSummaryResponse {
    let category = if include_category {
        record.category.map(category_summary)
    } else {
        None
    };
    PostSummaryResponse {
        id: record.id,
        slug: record.slug,
        featured_image: record.featured_image,
        published_at: record.published_at,
        view_count: record.view_count,
        like_count: record.like_count,
        author: record.author,
        category,
        title: record.title.unwrap_or_else(|| UNTITLED.to_string()),
        excerpt: record.excerpt,
        comment_count: record.comment_count,
    }
}

/// Resolve the requested status filter. Anything other than published
/// content (drafts, archived, or `ALL`) is moderator-only.
fn resolve_status_filter(
    status: Option<&str>,
    principal: Option<&crate::middleware::auth::AuthenticatedUser>,
) -> Result<Option<ContentStatus>, ApiError> {
    let requested = status.unwrap_or("PUBLISHED").to_uppercase();
    let filter = if requested == "ALL" {
        None
    } else {
        Some(ContentStatus::from_param(&requested).ok_or_else(|| {
            ApiError::validation("Status must be DRAFT, PUBLISHED, or ARCHIVED")
        })?)
    };

    if filter != Some(ContentStatus::Published) {
        let principal =
            principal.ok_or_else(|| ApiError::authentication("Authentication required"))?;
        principal.require_role(UserRole::Moderator)?;
    }

    Ok(filter)
}

/// Paginated, filtered, locale-resolved post listing.
pub async fn get_posts(
    State(pool): State<PgPool>,
    locale: Locale,
    MaybeAuthUser(principal): MaybeAuthUser,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = resolve_status_filter(query.status.as_deref(), principal.as_ref())?;
    let (page, limit, offset) = page_window(query.page, query.limit, 10);
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;

    let filter = PostFilter {
        language_id,
        status,
        category_slug: query.category,
        tag_slug: query.tag,
        search: query.search,
        author_username: query.author,
        published_since: None,
        sort: PostSort::from_param(query.sort.as_deref()),
        limit,
        offset,
    };
    let descending = query.order.as_deref() != Some("asc");

    let records = db::list(&pool, &filter, descending).await?;
    let total = db::count(&pool, &filter).await?;

    let post_ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
    let mut tag_map = group_tags(db::tags_for_posts(&pool, &post_ids, language_id).await?);

    let data: Vec<PostListItemResponse> = records
        .into_iter()
        .map(|record| {
            let tags = tag_map.remove(&record.id).unwrap_or_default();
            list_item(record, tags)
        })
        .collect();

    Ok(ApiResponse::ok_paginated(
        "Posts retrieved successfully",
        data,
        Pagination::new(page, limit, total),
    ))
}

/// Post detail by slug. Every call bumps the view counter by exactly one;
/// there is no viewer dedup.
pub async fn get_post_by_slug(
    State(pool): State<PgPool>,
    locale: Locale,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;

    let mut record = db::find_detail(&pool, &slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    record.view_count = db::increment_view_count(&pool, record.id).await?;

    let tags = db::tags_for_posts(&pool, &[record.id], language_id)
        .await?
        .into_iter()
        .map(tag_summary)
        .collect();
    let threads = comments::db::approved_threads(&pool, record.id, 10, 0).await?;

    let content = record.content.take().unwrap_or_default();
    let data = PostDetailResponse {
        post: list_item(record, tags),
        content,
        comments: threads
            .into_iter()
            .map(comments::handlers::thread_response)
            .collect(),
    };

    Ok(ApiResponse::ok("Post retrieved successfully", data))
}

/// Create a post with its initial translation.
pub async fn create_post(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<CreatePostRequest>,
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

    if let Some(category_id) = request.category_id {
        if !categories::db::exists(&pool, category_id).await? {
            return Err(ApiError::validation("Category not found"));
        }
    }
    if !request.tag_ids.is_empty()
        && tags::db::count_existing(&pool, &request.tag_ids).await? != request.tag_ids.len() as i64
    {
        return Err(ApiError::validation("One or more tags not found"));
    }

    let status = request.status.unwrap_or(ContentStatus::Draft);
    let published_at = (status == ContentStatus::Published).then(Utc::now);
    let excerpt = request
        .excerpt
        .clone()
        .or_else(|| Some(extract_excerpt(&request.content, 160)));

    let post = db::insert(
        &pool,
        NewPost {
            slug,
            featured_image: request.featured_image,
            status,
            published_at,
            read_time: reading_time(&request.content),
            author_id: principal.id,
            category_id: request.category_id,
            tag_ids: request.tag_ids,
        },
        NewPostTranslation {
            language_id: request.language_id,
            title: request.title,
            content: request.content,
            excerpt,
            meta_title: request.meta_title,
            meta_description: request.meta_description,
        },
    )
    .await?;
    tracing::info!("post created: {} by {}", post.slug, principal.username);

    let data = shaped_detail(&pool, &post.slug, Some(request.language_id)).await?;
    Ok(ApiResponse::created("Post created successfully", data))
}

/// Fetch and shape a post for create/update responses (no comments, no
/// view-count side effects).
async fn shaped_detail(
    pool: &PgPool,
    slug: &str,
    language_id: Option<Uuid>,
) -> Result<PostDetailResponse, ApiError> {
    let mut record = db::find_detail(pool, slug, language_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    let tags = db::tags_for_posts(pool, &[record.id], language_id)
        .await?
        .into_iter()
        .map(tag_summary)
        .collect();
    let content = record.content.take().unwrap_or_default();
    Ok(PostDetailResponse {
        post: list_item(record, tags),
        content,
        comments: Vec::new(),
    })
}

/// Partial update. `publishedAt` is set on the first transition into
/// published only; once set it is preserved forever.
pub async fn update_post(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    request.validate()?;

    let existing = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if let Some(slug) = &request.slug {
        if slug != &existing.slug && db::slug_exists(&pool, slug).await? {
            return Err(ApiError::conflict("Slug already exists"));
        }
    }
    if let Some(category_id) = request.category_id {
        if !categories::db::exists(&pool, category_id).await? {
            return Err(ApiError::validation("Category not found"));
        }
    }

    let published_at = if request.status == Some(ContentStatus::Published)
        && existing.published_at.is_none()
    {
        Some(Utc::now())
    } else {
        existing.published_at
    };

    let post = db::update(
        &pool,
        id,
        PostChanges {
            slug: request.slug,
            featured_image: request.featured_image,
            status: request.status,
            category_id: request.category_id,
            published_at,
        },
    )
    .await?;

    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let data = shaped_detail(&pool, &post.slug, language_id).await?;
    Ok(ApiResponse::ok("Post updated successfully", data))
}

/// Delete a post. Admin-only, and blocked while comments exist.
pub async fn delete_post(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Admin)?;

    let post = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if db::comment_count(&pool, id).await? > 0 {
        return Err(ApiError::dependency(
            "Cannot delete post with comments. Please delete comments first.",
        ));
    }

    db::delete(&pool, id).await?;
    tracing::info!("post deleted: {}", post.slug);

    Ok(ApiResponse::message("Post deleted successfully"))
}

/// "Toggle" like: increments the counter. There is no per-user tracking,
/// so this never decrements.
pub async fn toggle_post_like(
    State(pool): State<PgPool>,
    AuthUser(_principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if db::find_by_id(&pool, id).await?.is_none() {
        return Err(ApiError::not_found("Post not found"));
    }

    let like_count = db::increment_like_count(&pool, id).await?;
    Ok(ApiResponse::ok(
        "Post liked successfully",
        LikeResponse { like_count },
    ))
}

/// Most-viewed published posts from the last 30 days.
pub async fn get_popular_posts(
    State(pool): State<PgPool>,
    locale: Locale,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let filter = PostFilter {
        language_id,
        status: Some(ContentStatus::Published),
        published_since: Some(Utc::now() - Duration::days(30)),
        sort: PostSort::Popular,
        limit: query.limit.unwrap_or(5).clamp(1, 100),
        offset: 0,
        ..Default::default()
    };

    let records = db::list(&pool, &filter, true).await?;
    let data: Vec<PostSummaryResponse> = records
        .into_iter()
        .map(|record| post_summary(record, false))
        .collect();

    Ok(ApiResponse::ok("Popular posts retrieved successfully", data))
}

/// Latest published posts.
pub async fn get_recent_posts(
    State(pool): State<PgPool>,
    locale: Locale,
    Query(query): Query<LimitQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let filter = PostFilter {
        language_id,
        status: Some(ContentStatus::Published),
        sort: PostSort::PublishedAt,
        limit: query.limit.unwrap_or(5).clamp(1, 100),
        offset: 0,
        ..Default::default()
    };

    let records = db::list(&pool, &filter, true).await?;
    let data: Vec<PostSummaryResponse> = records
        .into_iter()
        .map(|record| post_summary(record, false))
        .collect();

    Ok(ApiResponse::ok("Recent posts retrieved successfully", data))
}

/// Published posts by one author, with the author's profile.
pub async fn get_posts_by_author(
    State(pool): State<PgPool>,
    locale: Locale,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author = users::find_by_username(&pool, &username)
        .await?
        .ok_or_else(|| ApiError::not_found("Author not found"))?;

    let (page, limit, offset) = page_window(query.page, query.limit, 10);
    let language_id = languages::db::resolve_language_id(&pool, locale.code()).await?;
    let filter = PostFilter {
        language_id,
        status: Some(ContentStatus::Published),
        author_username: Some(author.username.clone()),
        sort: PostSort::PublishedAt,
        limit,
        offset,
        ..Default::default()
    };

    let records = db::list(&pool, &filter, true).await?;
    let total = db::count(&pool, &filter).await?;

    let data = AuthorPostsResponse {
        author: AuthorProfile {
            id: author.id,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            avatar: author.avatar,
            bio: author.bio,
        },
        posts: records
            .into_iter()
            .map(|record| post_summary(record, true))
            .collect(),
    };

    Ok(ApiResponse::ok_paginated(
        "Author posts retrieved successfully",
        data,
        Pagination::new(page, limit, total),
    ))
}
