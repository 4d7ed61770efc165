//! Database operations for static pages.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::languages::db::Language;
use crate::posts::types::{AuthorSummary, ContentStatus};

/// A bare static page row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaticPage {
    pub id: Uuid,
    pub slug: String,
    pub status: ContentStatus,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A page joined with author and one language's translation columns.
#[derive(Debug)]
pub struct PageRecord {
    pub id: Uuid,
    pub slug: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorSummary,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// One translation row with its language, for the admin detail view.
#[derive(Debug)]
pub struct PageTranslation {
    pub language: Language,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

const RECORD_COLUMNS: &str = "sp.id, sp.slug, sp.status, sp.created_at, sp.updated_at, \
     u.id AS author_id, u.username AS author_username, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, \
     u.avatar AS author_avatar, \
     t.title, t.content, t.excerpt, t.meta_title, t.meta_description";

const RECORD_JOINS: &str = "FROM static_pages sp \
     JOIN users u ON u.id = sp.author_id \
     LEFT JOIN static_page_translations t ON t.page_id = sp.id AND t.language_id = $1";

fn record_from_row(row: &PgRow) -> Result<PageRecord, sqlx::Error> {
    Ok(PageRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        author: AuthorSummary {
            id: row.try_get("author_id")?,
            username: row.try_get("author_username")?,
            first_name: row.try_get("author_first_name")?,
            last_name: row.try_get("author_last_name")?,
            avatar: row.try_get("author_avatar")?,
        },
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        meta_title: row.try_get("meta_title")?,
        meta_description: row.try_get("meta_description")?,
    })
}

/// List pages, optionally restricted to published ones.
pub async fn list(
    pool: &PgPool,
    language_id: Option<Uuid>,
    published_only: bool,
) -> Result<Vec<PageRecord>, sqlx::Error> {
    let where_clause = if published_only {
        "WHERE sp.status = 'PUBLISHED'"
    } else {
        ""
    };
    let query = format!(
        "SELECT {RECORD_COLUMNS} {RECORD_JOINS} {where_clause} ORDER BY sp.created_at DESC"
    );
    let rows = sqlx::query(&query).bind(language_id).fetch_all(pool).await?;
    rows.iter().map(record_from_row).collect()
}

pub async fn find_record_by_slug(
    pool: &PgPool,
    slug: &str,
    language_id: Option<Uuid>,
) -> Result<Option<PageRecord>, sqlx::Error> {
    let query = format!("SELECT {RECORD_COLUMNS} {RECORD_JOINS} WHERE sp.slug = $2");
    let row = sqlx::query(&query)
        .bind(language_id)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(record_from_row).transpose()
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<StaticPage>, sqlx::Error> {
    sqlx::query_as::<_, StaticPage>("SELECT * FROM static_pages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Author summary for a page, used by the admin detail view.
pub async fn author_summary(pool: &PgPool, user_id: Uuid) -> Result<AuthorSummary, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, username, first_name, last_name, avatar FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(AuthorSummary {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        avatar: row.try_get("avatar")?,
    })
}

/// All translations of a page with their language rows.
pub async fn translations(pool: &PgPool, page_id: Uuid) -> Result<Vec<PageTranslation>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.title, t.content, t.excerpt, t.meta_title, t.meta_description,
               l.id AS language_id, l.code, l.name, l.native_name, l.is_active,
               l.is_default, l.created_at, l.updated_at
        FROM static_page_translations t
        JOIN languages l ON l.id = t.language_id
        WHERE t.page_id = $1
        ORDER BY l.is_default DESC, l.code ASC
        "#,
    )
    .bind(page_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(PageTranslation {
                language: Language {
                    id: row.try_get("language_id")?,
                    code: row.try_get("code")?,
                    name: row.try_get("name")?,
                    native_name: row.try_get("native_name")?,
                    is_active: row.try_get("is_active")?,
                    is_default: row.try_get("is_default")?,
                    created_at: row.try_get("created_at")?,
                    updated_at: row.try_get("updated_at")?,
                },
                title: row.try_get("title")?,
                content: row.try_get("content")?,
                excerpt: row.try_get("excerpt")?,
                meta_title: row.try_get("meta_title")?,
                meta_description: row.try_get("meta_description")?,
            })
        })
        .collect()
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM static_pages WHERE slug = $1) AS found")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    row.try_get("found")
}

#[derive(Debug)]
pub struct NewStaticPage {
    pub slug: String,
    pub status: ContentStatus,
    pub author_id: Uuid,
    pub language_id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Create a page and its initial translation in one transaction.
pub async fn insert(pool: &PgPool, new_page: NewStaticPage) -> Result<StaticPage, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let page = sqlx::query_as::<_, StaticPage>(
        r#"
        INSERT INTO static_pages (id, slug, status, author_id)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_page.slug)
    .bind(new_page.status)
    .bind(new_page.author_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO static_page_translations (id, page_id, language_id, title, content,
                                              excerpt, meta_title, meta_description)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(page.id)
    .bind(new_page.language_id)
    .bind(&new_page.title)
    .bind(&new_page.content)
    .bind(&new_page.excerpt)
    .bind(&new_page.meta_title)
    .bind(&new_page.meta_description)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(page)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    slug: Option<String>,
    status: Option<ContentStatus>,
) -> Result<StaticPage, sqlx::Error> {
    sqlx::query_as::<_, StaticPage>(
        r#"
        UPDATE static_pages
        SET slug = COALESCE($2, slug),
            status = COALESCE($3, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&slug)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM static_pages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
