//! `/api/*` resource routes.
//!
//! Authentication and roles are enforced by the handlers themselves (via
//! the `AuthUser` extractor and the role policy), so the table below only
//! wires verbs and paths.

use axum::routing::{get, post, put};
use axum::Router;

use crate::auth::handlers as auth;
use crate::categories::handlers as categories;
use crate::comments::handlers as comments;
use crate::languages::handlers as languages;
use crate::pages::handlers as pages;
use crate::posts::handlers as posts;
use crate::server::state::AppState;
use crate::tags::handlers as tags;

/// Configure all `/api` routes.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route(
            "/api/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/api/auth/change-password", put(auth::change_password))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/refresh", post(auth::refresh_token))
        // Posts
        .route("/api/posts", get(posts::get_posts).post(posts::create_post))
        .route("/api/posts/popular", get(posts::get_popular_posts))
        .route("/api/posts/recent", get(posts::get_recent_posts))
        .route("/api/posts/author/{username}", get(posts::get_posts_by_author))
        .route(
            "/api/posts/{slug}",
            get(posts::get_post_by_slug)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/api/posts/{slug}/like", post(posts::toggle_post_like))
        // Categories
        .route(
            "/api/categories",
            get(categories::get_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/{slug}",
            get(categories::get_category_by_slug)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Tags
        .route("/api/tags", get(tags::get_tags).post(tags::create_tag))
        .route("/api/tags/popular", get(tags::get_popular_tags))
        .route(
            "/api/tags/{slug}",
            get(tags::get_tag_by_slug)
                .put(tags::update_tag)
                .delete(tags::delete_tag),
        )
        // Comments
        .route(
            "/api/comments/post/{post_slug}",
            get(comments::get_post_comments).post(comments::create_comment),
        )
        .route("/api/comments/admin/pending", get(comments::get_pending_comments))
        .route(
            "/api/comments/{id}",
            get(comments::get_comment_by_id)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/comments/{id}/approve", put(comments::approve_comment))
        .route("/api/comments/{id}/reject", put(comments::reject_comment))
        // Languages
        .route(
            "/api/languages",
            get(languages::list_languages).post(languages::create_language),
        )
        .route("/api/languages/default", get(languages::get_default_language))
        .route("/api/languages/admin/stats", get(languages::get_language_stats))
        .route(
            "/api/languages/{id}",
            get(languages::get_language_by_code)
                .put(languages::update_language)
                .delete(languages::delete_language),
        )
        .route(
            "/api/languages/{id}/set-default",
            put(languages::set_default_language),
        )
        .route(
            "/api/languages/{id}/toggle-status",
            put(languages::toggle_language_status),
        )
        // Static pages
        .route(
            "/api/static-pages",
            get(pages::get_static_pages).post(pages::create_static_page),
        )
        .route("/api/static-pages/admin/all", get(pages::get_all_static_pages))
        .route("/api/static-pages/admin/{id}", get(pages::get_static_page_by_id))
        .route(
            "/api/static-pages/{slug}",
            get(pages::get_static_page_by_slug)
                .put(pages::update_static_page)
                .delete(pages::delete_static_page),
        )
}
