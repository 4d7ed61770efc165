//! Database operations for comments.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::comments::types::CommentStatus;
use crate::posts::types::AuthorSummary;

/// A bare comment row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment joined with its author and owning post slug.
#[derive(Debug)]
pub struct CommentRecord {
    pub id: Uuid,
    pub content: String,
    pub status: CommentStatus,
    pub post_id: Uuid,
    pub post_slug: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
}

const RECORD_COLUMNS: &str = "c.id, c.content, c.status, c.post_id, c.parent_id, c.created_at, \
     c.updated_at, p.slug AS post_slug, u.id AS author_id, u.username AS author_username, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, u.avatar AS author_avatar";

const RECORD_JOINS: &str =
    "FROM comments c JOIN users u ON u.id = c.author_id JOIN posts p ON p.id = c.post_id";

fn record_from_row(row: &PgRow) -> Result<CommentRecord, sqlx::Error> {
    Ok(CommentRecord {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        status: row.try_get("status")?,
        post_id: row.try_get("post_id")?,
        post_slug: row.try_get("post_slug")?,
        parent_id: row.try_get("parent_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        author: AuthorSummary {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
            avatar: row.try_get("author_avatar")?,
        },
    })
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Single comment with author and post context.
pub async fn find_record(pool: &PgPool, id: Uuid) -> Result<Option<CommentRecord>, sqlx::Error> {
    let query = format!("SELECT {RECORD_COLUMNS} {RECORD_JOINS} WHERE c.id = $1");
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(record_from_row).transpose()
}

/// Approved top-level comments for a post, newest first, each with its
/// approved replies in ascending order.
pub async fn approved_threads(
    pool: &PgPool,
    post_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<(CommentRecord, Vec<CommentRecord>)>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {RECORD_COLUMNS} {RECORD_JOINS}
        WHERE c.post_id = $1 AND c.status = 'APPROVED' AND c.parent_id IS NULL
        ORDER BY c.created_at DESC
        LIMIT $2 OFFSET $3
        "#
    );
    let rows = sqlx::query(&query)
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    let top_level: Vec<CommentRecord> = rows
        .iter()
        .map(record_from_row)
        .collect::<Result<_, _>>()?;

    let parent_ids: Vec<Uuid> = top_level.iter().map(|c| c.id).collect();
    let query = format!(
        r#"
        SELECT {RECORD_COLUMNS} {RECORD_JOINS}
        WHERE c.parent_id = ANY($1) AND c.status = 'APPROVED'
        ORDER BY c.created_at ASC
        "#
    );
    let rows = sqlx::query(&query).bind(&parent_ids).fetch_all(pool).await?;
    let replies: Vec<CommentRecord> = rows
        .iter()
        .map(record_from_row)
        .collect::<Result<_, _>>()?;

    let mut threads: Vec<(CommentRecord, Vec<CommentRecord>)> = top_level
        .into_iter()
        .map(|comment| (comment, Vec::new()))
        .collect();
    for reply in replies {
        if let Some((_, own)) = threads
            .iter_mut()
            .find(|(comment, _)| Some(comment.id) == reply.parent_id)
        {
            own.push(reply);
        }
    }

    Ok(threads)
}

pub async fn count_approved_top_level(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM comments
         WHERE post_id = $1 AND status = 'APPROVED' AND parent_id IS NULL",
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;
    row.try_get("count")
}

/// Replies belonging to a comment (approved only).
pub async fn approved_replies(
    pool: &PgPool,
    parent_id: Uuid,
) -> Result<Vec<CommentRecord>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {RECORD_COLUMNS} {RECORD_JOINS}
        WHERE c.parent_id = $1 AND c.status = 'APPROVED'
        ORDER BY c.created_at ASC
        "#
    );
    let rows = sqlx::query(&query).bind(parent_id).fetch_all(pool).await?;
    rows.iter().map(record_from_row).collect()
}

#[derive(Debug)]
pub struct NewComment {
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
}

pub async fn insert(pool: &PgPool, new_comment: NewComment) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, content, status, author_id, post_id, parent_id)
        VALUES ($1, $2, 'PENDING', $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_comment.content)
    .bind(new_comment.author_id)
    .bind(new_comment.post_id)
    .bind(new_comment.parent_id)
    .fetch_one(pool)
    .await
}

pub async fn update_content(pool: &PgPool, id: Uuid, content: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET content = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(content)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: CommentStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn reply_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE parent_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}

/// Pending comments across all posts, newest first.
pub async fn pending(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<CommentRecord>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {RECORD_COLUMNS} {RECORD_JOINS}
        WHERE c.status = 'PENDING'
        ORDER BY c.created_at DESC
        LIMIT $1 OFFSET $2
        "#
    );
    let rows = sqlx::query(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    rows.iter().map(record_from_row).collect()
}

pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE status = 'PENDING'")
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}
