//! HTTP handlers for `/api/comments`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::UserRole;
use crate::comments::db::{self, CommentRecord, NewComment};
use crate::comments::types::{
    CommentDetailResponse, CommentReplyResponse, CommentResponse, CommentStatus,
    CommentThreadResponse, CreateCommentRequest, PostRefResponse, UpdateCommentRequest,
};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::posts;
use crate::posts::types::PageQuery;
use crate::response::{page_window, ApiResponse, Pagination};

fn comment_response(record: CommentRecord) -> CommentResponse {
    CommentResponse {
        id: record.id,
        content: record.content,
        status: record.status,
        parent_id: record.parent_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
        author: record.author,
        post: Some(PostRefResponse {
            id: record.post_id,
            slug: record.post_slug,
        }),
    }
}

pub(crate) fn reply_response(record: CommentRecord) -> CommentReplyResponse {
    CommentReplyResponse {
        id: record.id,
        content: record.content,
        created_at: record.created_at,
        updated_at: record.updated_at,
        author: record.author,
    }
}

pub(crate) fn thread_response(
    (comment, replies): (CommentRecord, Vec<CommentRecord>),
) -> CommentThreadResponse {
    CommentThreadResponse {
        id: comment.id,
        content: comment.content,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        author: comment.author,
        replies: replies.into_iter().map(reply_response).collect(),
    }
}

/// Approved comments for a post, paginated. Pending and rejected comments
/// are invisible here.
pub async fn get_post_comments(
    State(pool): State<PgPool>,
    Path(post_slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let post = posts::db::find_by_slug(&pool, &post_slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    let (page, limit, offset) = page_window(query.page, query.limit, 10);
    let threads = db::approved_threads(&pool, post.id, limit, offset).await?;
    let total = db::count_approved_top_level(&pool, post.id).await?;

    let data: Vec<CommentThreadResponse> = threads.into_iter().map(thread_response).collect();
    Ok(ApiResponse::ok_paginated(
        "Comments retrieved successfully",
        data,
        Pagination::new(page, limit, total),
    ))
}

/// Single comment with its post, parent and approved replies.
pub async fn get_comment_by_id(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = db::find_record(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    let parent = match record.parent_id {
        Some(parent_id) => db::find_record(&pool, parent_id).await?,
        None => None,
    };
    let replies = db::approved_replies(&pool, record.id).await?;

    let data = CommentDetailResponse {
        id: record.id,
        content: record.content,
        status: record.status,
        parent_id: record.parent_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
        author: record.author,
        post: PostRefResponse {
            id: record.post_id,
            slug: record.post_slug,
        },
        parent: parent.map(|p| Box::new(comment_response(p))),
        replies: replies.into_iter().map(reply_response).collect(),
    };

    Ok(ApiResponse::ok("Comment retrieved successfully", data))
}

/// Create a comment on a post. Always starts pending moderation.
pub async fn create_comment(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(post_slug): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let post = posts::db::find_by_slug(&pool, &post_slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if let Some(parent_id) = request.parent_id {
        let parent = db::find_by_id(&pool, parent_id)
            .await?
            .ok_or_else(|| ApiError::validation("Parent comment not found"))?;
        if parent.post_id != post.id {
            return Err(ApiError::validation(
                "Parent comment does not belong to this post",
            ));
        }
    }

    let comment = db::insert(
        &pool,
        NewComment {
            content: request.content,
            author_id: principal.id,
            post_id: post.id,
            parent_id: request.parent_id,
        },
    )
    .await?;

    let record = db::find_record(&pool, comment.id)
        .await?
        .ok_or_else(|| ApiError::internal("created comment vanished"))?;
    tracing::info!("comment created on {} by {}", post.slug, principal.username);

    Ok(ApiResponse::created(
        "Comment created successfully. It will be published after approval.",
        comment_response(record),
    ))
}

/// Edit a comment's content. Author-only, unless moderator or admin.
pub async fn update_comment(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let comment = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if !principal.owns_or_moderates(comment.author_id) {
        return Err(ApiError::authorization("You can only edit your own comments"));
    }

    db::update_content(&pool, id, &request.content).await?;
    let record = db::find_record(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(ApiResponse::ok(
        "Comment updated successfully",
        comment_response(record),
    ))
}

/// Delete a comment. Blocked while replies exist.
pub async fn delete_comment(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    if !principal.owns_or_moderates(comment.author_id) {
        return Err(ApiError::authorization(
            "You can only delete your own comments",
        ));
    }

    if db::reply_count(&pool, id).await? > 0 {
        return Err(ApiError::dependency(
            "Cannot delete comment with replies. Please delete replies first.",
        ));
    }

    db::delete(&pool, id).await?;
    Ok(ApiResponse::message("Comment deleted successfully"))
}

async fn moderate(
    pool: &PgPool,
    id: Uuid,
    status: CommentStatus,
) -> Result<CommentRecord, ApiError> {
    if db::find_by_id(pool, id).await?.is_none() {
        return Err(ApiError::not_found("Comment not found"));
    }
    db::set_status(pool, id, status).await?;
    db::find_record(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))
}

/// Approve a comment. Re-approving an approved comment is a no-op.
pub async fn approve_comment(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    let record = moderate(&pool, id, CommentStatus::Approved).await?;
    Ok(ApiResponse::ok(
        "Comment approved successfully",
        comment_response(record),
    ))
}

pub async fn reject_comment(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;
    let record = moderate(&pool, id, CommentStatus::Rejected).await?;
    Ok(ApiResponse::ok(
        "Comment rejected successfully",
        comment_response(record),
    ))
}

/// Moderation queue: pending comments across all posts.
pub async fn get_pending_comments(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    principal.require_role(UserRole::Moderator)?;

    let (page, limit, offset) = page_window(query.page, query.limit, 20);
    let records = db::pending(&pool, limit, offset).await?;
    let total = db::count_pending(&pool).await?;

    let data: Vec<CommentResponse> = records.into_iter().map(comment_response).collect();
    Ok(ApiResponse::ok_paginated(
        "Pending comments retrieved successfully",
        data,
        Pagination::new(page, limit, total),
    ))
}
