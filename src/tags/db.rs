//! Database operations for tags.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// A bare tag row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tag joined with one language's translation and its referencing-post
/// count. The count includes every post linked through `post_tags`, which
/// is also the criterion that blocks deletion.
#[derive(Debug, sqlx::FromRow)]
pub struct TagRecord {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: Option<String>,
    pub post_count: i64,
}

const RECORD_QUERY: &str = "SELECT g.id, g.slug, g.color, g.created_at, g.updated_at, t.name, \
     (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = g.id) AS post_count \
     FROM tags g \
     LEFT JOIN tag_translations t ON t.tag_id = g.id AND t.language_id = $1";

pub async fn list(pool: &PgPool, language_id: Option<Uuid>) -> Result<Vec<TagRecord>, sqlx::Error> {
    let query = format!("{RECORD_QUERY} ORDER BY g.created_at DESC");
    sqlx::query_as::<_, TagRecord>(&query)
        .bind(language_id)
        .fetch_all(pool)
        .await
}

/// Tags ordered by how many posts reference them.
pub async fn popular(
    pool: &PgPool,
    language_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<TagRecord>, sqlx::Error> {
    let query = format!("{RECORD_QUERY} ORDER BY post_count DESC LIMIT $2");
    sqlx::query_as::<_, TagRecord>(&query)
        .bind(language_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn find_record_by_slug(
    pool: &PgPool,
    slug: &str,
    language_id: Option<Uuid>,
) -> Result<Option<TagRecord>, sqlx::Error> {
    let query = format!("{RECORD_QUERY} WHERE g.slug = $2");
    sqlx::query_as::<_, TagRecord>(&query)
        .bind(language_id)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Tag>, sqlx::Error> {
    sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM tags WHERE slug = $1) AS found")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    row.try_get("found")
}

/// How many of the given ids exist. Used to reject unknown tags on post
/// creation.
pub async fn count_existing(pool: &PgPool, ids: &[Uuid]) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM tags WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}

#[derive(Debug)]
pub struct NewTag {
    pub slug: String,
    pub color: Option<String>,
    pub language_id: Uuid,
    pub name: String,
}

/// Create a tag and its initial translation in one transaction.
pub async fn insert(pool: &PgPool, new_tag: NewTag) -> Result<Tag, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let tag = sqlx::query_as::<_, Tag>(
        "INSERT INTO tags (id, slug, color) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&new_tag.slug)
    .bind(&new_tag.color)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO tag_translations (id, tag_id, language_id, name) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(tag.id)
    .bind(new_tag.language_id)
    .bind(&new_tag.name)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(tag)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    slug: Option<String>,
    color: Option<String>,
) -> Result<Tag, sqlx::Error> {
    sqlx::query_as::<_, Tag>(
        r#"
        UPDATE tags
        SET slug = COALESCE($2, slug),
            color = COALESCE($3, color),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&slug)
    .bind(&color)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tags WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn post_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM post_tags WHERE tag_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}
