//! Database operations for categories.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

/// A bare category row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category joined with one language's translation and its post count.
#[derive(Debug, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub post_count: i64,
}

const RECORD_QUERY: &str = "SELECT c.id, c.slug, c.color, c.icon, c.is_active, c.created_at, \
     c.updated_at, t.name, t.description, \
     (SELECT COUNT(*) FROM posts p WHERE p.category_id = c.id) AS post_count \
     FROM categories c \
     LEFT JOIN category_translations t ON t.category_id = c.id AND t.language_id = $1";

/// Active categories with translations, newest first.
pub async fn list(
    pool: &PgPool,
    language_id: Option<Uuid>,
) -> Result<Vec<CategoryRecord>, sqlx::Error> {
    let query = format!("{RECORD_QUERY} WHERE c.is_active = TRUE ORDER BY c.created_at DESC");
    sqlx::query_as::<_, CategoryRecord>(&query)
        .bind(language_id)
        .fetch_all(pool)
        .await
}

pub async fn find_record_by_slug(
    pool: &PgPool,
    slug: &str,
    language_id: Option<Uuid>,
) -> Result<Option<CategoryRecord>, sqlx::Error> {
    let query = format!("{RECORD_QUERY} WHERE c.slug = $2");
    sqlx::query_as::<_, CategoryRecord>(&query)
        .bind(language_id)
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1) AS found")
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_get("found")
}

pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM categories WHERE slug = $1) AS found")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    row.try_get("found")
}

#[derive(Debug)]
pub struct NewCategory {
    pub slug: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub language_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Create a category and its initial translation in one transaction.
pub async fn insert(pool: &PgPool, new_category: NewCategory) -> Result<Category, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (id, slug, color, icon)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_category.slug)
    .bind(&new_category.color)
    .bind(&new_category.icon)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO category_translations (id, category_id, language_id, name, description)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(category.id)
    .bind(new_category.language_id)
    .bind(&new_category.name)
    .bind(&new_category.description)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(category)
}

#[derive(Debug)]
pub struct CategoryChanges {
    pub slug: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: CategoryChanges,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET slug = COALESCE($2, slug),
            color = COALESCE($3, color),
            icon = COALESCE($4, icon),
            is_active = COALESCE($5, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.slug)
    .bind(&changes.color)
    .bind(&changes.icon)
    .bind(changes.is_active)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn post_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE category_id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    row.try_get("count")
}
