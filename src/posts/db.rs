//! Database operations for posts.
//!
//! List/detail queries join the author, the optional category and the
//! translation rows for one language id. Translation columns come back as
//! `Option`; the handlers decide what to show when no translation exists.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::posts::types::{AuthorSummary, ContentStatus};

/// A bare post row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub featured_image: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category columns joined into a post row.
#[derive(Debug, Clone)]
pub struct CategoryJoin {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A post joined with author, category and translation columns.
#[derive(Debug)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub featured_image: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub author_bio: Option<String>,
    pub category: Option<CategoryJoin>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub comment_count: i64,
}

/// Tag columns joined per post, for batch tag lookups.
#[derive(Debug)]
pub struct TagJoin {
    pub post_id: Uuid,
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub name: Option<String>,
}

/// Filters and ordering for post listings. `$1` in the queries below is
/// always the language id used for translation joins.
#[derive(Debug, Default)]
pub struct PostFilter {
    pub language_id: Option<Uuid>,
    pub status: Option<ContentStatus>,
    pub category_slug: Option<String>,
    pub tag_slug: Option<String>,
    pub search: Option<String>,
    pub author_username: Option<String>,
    pub published_since: Option<DateTime<Utc>>,
    pub sort: PostSort,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostSort {
    #[default]
    PublishedAt,
    CreatedAt,
    ViewCount,
    LikeCount,
    /// Views first, likes as tie-breaker. Always descending.
    Popular,
}

impl PostSort {
    /// Map a `sort` query value onto a whitelisted column.
    pub fn from_param(sort: Option<&str>) -> Self {
        match sort {
            Some("createdAt") => Self::CreatedAt,
            Some("viewCount") => Self::ViewCount,
            Some("likeCount") => Self::LikeCount,
            _ => Self::PublishedAt,
        }
    }

    fn clause(self, descending: bool) -> String {
        let direction = if descending { "DESC" } else { "ASC" };
        match self {
            Self::PublishedAt => format!("p.published_at {direction} NULLS LAST"),
            Self::CreatedAt => format!("p.created_at {direction}"),
            Self::ViewCount => format!("p.view_count {direction}"),
            Self::LikeCount => format!("p.like_count {direction}"),
            Self::Popular => "p.view_count DESC, p.like_count DESC".to_string(),
        }
    }
}

const LIST_COLUMNS: &str = "p.id, p.slug, p.featured_image, p.status, p.published_at, p.read_time, \
     p.view_count, p.like_count, p.created_at, p.updated_at, \
     u.id AS author_id, u.username AS author_username, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, \
     u.avatar AS author_avatar, \
     c.id AS category_id, c.slug AS category_slug, c.color AS category_color, \
     c.icon AS category_icon, ct.name AS category_name, \
     ct.description AS category_description, \
     pt.title, pt.excerpt, pt.meta_title, pt.meta_description, \
     (SELECT COUNT(*) FROM comments cm WHERE cm.post_id = p.id) AS comment_count";

const LIST_JOINS: &str = "FROM posts p \
     JOIN users u ON u.id = p.author_id \
     LEFT JOIN categories c ON c.id = p.category_id \
     LEFT JOIN category_translations ct ON ct.category_id = c.id AND ct.language_id = $1 \
     LEFT JOIN post_translations pt ON pt.post_id = p.id AND pt.language_id = $1";

const LIST_WHERE: &str = "($2::text IS NULL OR p.status = $2) \
     AND ($3::text IS NULL OR c.slug = $3) \
     AND ($4::text IS NULL OR EXISTS ( \
         SELECT 1 FROM post_tags x JOIN tags t ON t.id = x.tag_id \
         WHERE x.post_id = p.id AND t.slug = $4)) \
     AND ($5::text IS NULL OR EXISTS ( \
         SELECT 1 FROM post_translations s \
         WHERE s.post_id = p.id AND s.title ILIKE '%' || $5 || '%')) \
     AND ($6::text IS NULL OR u.username = $6) \
     AND ($7::timestamptz IS NULL OR p.published_at >= $7)";

fn record_from_row(row: &PgRow, detail: bool) -> Result<PostRecord, sqlx::Error> {
    let category_id: Option<Uuid> = row.try_get("category_id")?;
    let category = match category_id {
        Some(id) => Some(CategoryJoin {
            id,
            slug: row.try_get("category_slug")?,
            color: row.try_get("category_color")?,
            icon: row.try_get("category_icon")?,
            name: row.try_get("category_name")?,
            description: row.try_get("category_description")?,
        }),
        None => None,
    };

    Ok(PostRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        featured_image: row.try_get("featured_image")?,
        status: row.try_get("status")?,
        published_at: row.try_get("published_at")?,
        read_time: row.try_get("read_time")?,
        view_count: row.try_get("view_count")?,
        like_count: row.try_get("like_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        author: AuthorSummary {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
            avatar: row.try_get("author_avatar")?,
        },
        author_bio: if detail { row.try_get("author_bio")? } else { None },
        category,
        title: row.try_get("title")?,
        content: if detail { row.try_get("content")? } else { None },
        excerpt: row.try_get("excerpt")?,
        meta_title: row.try_get("meta_title")?,
        meta_description: row.try_get("meta_description")?,
        comment_count: row.try_get("comment_count")?,
    })
}

fn status_param(status: Option<ContentStatus>) -> Option<&'static str> {
    status.map(|status| match status {
        ContentStatus::Draft => "DRAFT",
        ContentStatus::Published => "PUBLISHED",
        ContentStatus::Archived => "ARCHIVED",
    })
}

pub async fn list(
    pool: &PgPool,
    filter: &PostFilter,
    descending: bool,
) -> Result<Vec<PostRecord>, sqlx::Error> {
    let query = format!(
        "SELECT {LIST_COLUMNS} {LIST_JOINS} WHERE {LIST_WHERE} ORDER BY {} LIMIT $8 OFFSET $9",
        filter.sort.clause(descending),
    );
    let rows = sqlx::query(&query)
        .bind(filter.language_id)
        .bind(status_param(filter.status))
        .bind(&filter.category_slug)
        .bind(&filter.tag_slug)
        .bind(&filter.search)
        .bind(&filter.author_username)
        .bind(filter.published_since)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(pool)
        .await?;
    rows.iter().map(|row| record_from_row(row, false)).collect()
}

pub async fn count(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let query = "SELECT COUNT(*) AS count FROM posts p \
         JOIN users u ON u.id = p.author_id \
         LEFT JOIN categories c ON c.id = p.category_id \
         WHERE ($1::text IS NULL OR p.status = $1) \
           AND ($2::text IS NULL OR c.slug = $2) \
           AND ($3::text IS NULL OR EXISTS ( \
               SELECT 1 FROM post_tags x JOIN tags t ON t.id = x.tag_id \
               WHERE x.post_id = p.id AND t.slug = $3)) \
           AND ($4::text IS NULL OR EXISTS ( \
               SELECT 1 FROM post_translations s \
               WHERE s.post_id = p.id AND s.title ILIKE '%' || $4 || '%')) \
           AND ($5::text IS NULL OR u.username = $5) \
           AND ($6::timestamptz IS NULL OR p.published_at >= $6)";
    let row = sqlx::query(query)
        .bind(status_param(filter.status))
        .bind(&filter.category_slug)
        .bind(&filter.tag_slug)
        .bind(&filter.search)
        .bind(&filter.author_username)
        .bind(filter.published_since)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}

/// Full post record for the detail view, including content and author bio.
pub async fn find_detail(
    pool: &PgPool,
    slug: &str,
    language_id: Option<Uuid>,
) -> Result<Option<PostRecord>, sqlx::Error> {
    let query = format!(
        "SELECT {LIST_COLUMNS}, pt.content, u.bio AS author_bio {LIST_JOINS} WHERE p.slug = $2"
    );
    let row = sqlx::query(&query)
        .bind(language_id)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(|row| record_from_row(row, true)).transpose()
}

/// Tags for a batch of posts, with the translation for one language.
pub async fn tags_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
    language_id: Option<Uuid>,
) -> Result<Vec<TagJoin>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query(
        r#"
        SELECT x.post_id, t.id, t.slug, t.color, tt.name
        FROM post_tags x
        JOIN tags t ON t.id = x.tag_id
        LEFT JOIN tag_translations tt ON tt.tag_id = t.id AND tt.language_id = $2
        WHERE x.post_id = ANY($1)
        ORDER BY t.created_at ASC
        "#,
    )
    .bind(post_ids)
    .bind(language_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(TagJoin {
                post_id: row.try_get("post_id")?,
                id: row.try_get("id")?,
                slug: row.try_get("slug")?,
                color: row.try_get("color")?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1) AS found")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    row.try_get("found")
}

/// Bump the view counter. Monotonic, no viewer dedup. Returns the new value.
pub async fn increment_view_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    row.try_get("view_count")
}

/// Bump the like counter. There is no per-user tracking, so this never
/// decrements. Returns the new value.
pub async fn increment_like_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "UPDATE posts SET like_count = like_count + 1 WHERE id = $1 RETURNING like_count",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    row.try_get("like_count")
}

#[derive(Debug)]
pub struct NewPost {
    pub slug: String,
    pub featured_image: Option<String>,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug)]
pub struct NewPostTranslation {
    pub language_id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Create a post, its initial translation and tag links in one transaction.
pub async fn insert(
    pool: &PgPool,
    new_post: NewPost,
    translation: NewPostTranslation,
) -> Result<Post, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, slug, featured_image, status, published_at, read_time,
                           author_id, category_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_post.slug)
    .bind(&new_post.featured_image)
    .bind(new_post.status)
    .bind(new_post.published_at)
    .bind(new_post.read_time)
    .bind(new_post.author_id)
    .bind(new_post.category_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO post_translations (id, post_id, language_id, title, content, excerpt,
                                       meta_title, meta_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(post.id)
    .bind(translation.language_id)
    .bind(&translation.title)
    .bind(&translation.content)
    .bind(&translation.excerpt)
    .bind(&translation.meta_title)
    .bind(&translation.meta_description)
    .execute(&mut *tx)
    .await?;

    for tag_id in &new_post.tag_ids {
        sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2)")
            .bind(post.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(post)
}

#[derive(Debug)]
pub struct PostChanges {
    pub slug: Option<String>,
    pub featured_image: Option<String>,
    pub status: Option<ContentStatus>,
    pub category_id: Option<Uuid>,
    /// Final value, already resolved by the handler (set on the first
    /// transition to published, preserved otherwise).
    pub published_at: Option<DateTime<Utc>>,
}

pub async fn update(pool: &PgPool, id: Uuid, changes: PostChanges) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET slug = COALESCE($2, slug),
            featured_image = COALESCE($3, featured_image),
            status = COALESCE($4, status),
            category_id = COALESCE($5, category_id),
            published_at = $6,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.slug)
    .bind(&changes.featured_image)
    .bind(changes.status)
    .bind(changes.category_id)
    .bind(changes.published_at)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn comment_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE post_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}
