//! Database operations for languages.
//!
//! Default-language changes are two statements (unset the old default, set
//! the new one) and always run inside a transaction so concurrent requests
//! can never observe zero or multiple defaults.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Language {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_active: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row counts of translations referencing a language.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct ReferenceCounts {
    pub posts: i64,
    pub categories: i64,
    pub tags: i64,
    pub static_pages: i64,
}

impl ReferenceCounts {
    pub fn total(&self) -> i64 {
        self.posts + self.categories + self.tags + self.static_pages
    }
}

#[derive(Debug)]
pub struct NewLanguage {
    pub code: String,
    pub name: String,
    pub native_name: String,
    pub is_default: bool,
}

#[derive(Debug)]
pub struct LanguageChanges {
    pub name: Option<String>,
    pub native_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_default: Option<bool>,
}

pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<Language>, sqlx::Error> {
    let query = if active_only {
        "SELECT * FROM languages WHERE is_active = TRUE ORDER BY is_default DESC, name ASC"
    } else {
        "SELECT * FROM languages ORDER BY is_default DESC, name ASC"
    };
    sqlx::query_as::<_, Language>(query).fetch_all(pool).await
}

pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Language>, sqlx::Error> {
    sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Language>, sqlx::Error> {
    sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_default(pool: &PgPool) -> Result<Option<Language>, sqlx::Error> {
    sqlx::query_as::<_, Language>("SELECT * FROM languages WHERE is_default = TRUE")
        .fetch_optional(pool)
        .await
}

/// Resolve a request locale code to the language id used in translation
/// joins. Returns `None` when the code is not present in the table.
pub async fn resolve_language_id(pool: &PgPool, code: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query("SELECT id FROM languages WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("id")))
}

pub async fn insert(pool: &PgPool, new_language: NewLanguage) -> Result<Language, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if new_language.is_default {
        sqlx::query("UPDATE languages SET is_default = FALSE, updated_at = NOW() WHERE is_default = TRUE")
            .execute(&mut *tx)
            .await?;
    }

    let language = sqlx::query_as::<_, Language>(
        r#"
        INSERT INTO languages (id, code, name, native_name, is_active, is_default)
        VALUES ($1, $2, $3, $4, TRUE, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new_language.code)
    .bind(&new_language.name)
    .bind(&new_language.native_name)
    .bind(new_language.is_default)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(language)
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    changes: LanguageChanges,
) -> Result<Language, sqlx::Error> {
    let mut tx = pool.begin().await?;

    if changes.is_default == Some(true) {
        sqlx::query("UPDATE languages SET is_default = FALSE, updated_at = NOW() WHERE is_default = TRUE")
            .execute(&mut *tx)
            .await?;
    }

    let language = sqlx::query_as::<_, Language>(
        r#"
        UPDATE languages
        SET name = COALESCE($2, name),
            native_name = COALESCE($3, native_name),
            is_active = COALESCE($4, is_active),
            is_default = COALESCE($5, is_default),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.native_name)
    .bind(changes.is_active)
    .bind(changes.is_default)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(language)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM languages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Atomically move the default flag onto `id`.
pub async fn set_default(pool: &PgPool, id: Uuid) -> Result<Language, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE languages SET is_default = FALSE, updated_at = NOW() WHERE is_default = TRUE")
        .execute(&mut *tx)
        .await?;

    let language = sqlx::query_as::<_, Language>(
        "UPDATE languages SET is_default = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(language)
}

pub async fn set_active(pool: &PgPool, id: Uuid, active: bool) -> Result<Language, sqlx::Error> {
    sqlx::query_as::<_, Language>(
        "UPDATE languages SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(active)
    .fetch_one(pool)
    .await
}

pub async fn reference_counts(pool: &PgPool, id: Uuid) -> Result<ReferenceCounts, sqlx::Error> {
    sqlx::query_as::<_, ReferenceCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM post_translations WHERE language_id = $1) AS posts,
            (SELECT COUNT(*) FROM category_translations WHERE language_id = $1) AS categories,
            (SELECT COUNT(*) FROM tag_translations WHERE language_id = $1) AS tags,
            (SELECT COUNT(*) FROM static_page_translations WHERE language_id = $1) AS static_pages
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// All languages with their translation counts, for the admin stats view.
pub async fn stats(pool: &PgPool) -> Result<Vec<(Language, ReferenceCounts)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT l.id, l.code, l.name, l.native_name, l.is_active, l.is_default,
               l.created_at, l.updated_at,
               (SELECT COUNT(*) FROM post_translations WHERE language_id = l.id) AS posts,
               (SELECT COUNT(*) FROM category_translations WHERE language_id = l.id) AS categories,
               (SELECT COUNT(*) FROM tag_translations WHERE language_id = l.id) AS tags,
               (SELECT COUNT(*) FROM static_page_translations WHERE language_id = l.id) AS static_pages
        FROM languages l
        ORDER BY l.is_default DESC, l.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                Language {
                    id: row.get("id"),
                    code: row.get("code"),
                    name: row.get("name"),
                    native_name: row.get("native_name"),
                    is_active: row.get("is_active"),
                    is_default: row.get("is_default"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                },
                ReferenceCounts {
                    posts: row.get("posts"),
                    categories: row.get("categories"),
                    tags: row.get("tags"),
                    static_pages: row.get("static_pages"),
                },
            )
        })
        .collect())
}
