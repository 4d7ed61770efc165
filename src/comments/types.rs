//! Request and response types for `/api/comments`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::posts::types::AuthorSummary;
use crate::validation::{len_between, Validator};

/// Moderation states. New comments always start `Pending`; `approve` and
/// `reject` are the only transitions, and there is no way back to pending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<Uuid>,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "content",
            len_between(&self.content, 1, 1000),
            "Content must be 1-1000 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

impl UpdateCommentRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "content",
            len_between(&self.content, 1, 1000),
            "Content must be 1-1000 characters",
        );
        v.finish()
    }
}

/// The post a comment belongs to, as shown in comment responses.
#[derive(Debug, Clone, Serialize)]
pub struct PostRefResponse {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRefResponse>,
}

/// A top-level approved comment with its approved replies, as embedded in
/// public listings and the post detail view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub replies: Vec<CommentReplyResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentReplyResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
}

/// Full view of a single comment, including its parent and replies.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetailResponse {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub post: PostRefResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<CommentResponse>>,
    pub replies: Vec<CommentReplyResponse>,
}
