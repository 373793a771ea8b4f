//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{
    admin, auth, comments, health, notifications, reactions, topics, uploads, users, votes,
};
use crate::state::AppState;

/// Headroom over the image limit so oversized files still reach the upload
/// handler and get its plain-text 413
const UPLOAD_BODY_SLACK: usize = 1024 * 1024;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes(max_upload_bytes))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(topic_routes())
        .merge(comment_routes())
        .merge(notification_routes())
        .merge(admin_routes())
        .merge(upload_routes(max_upload_bytes))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/kakao", post(auth::kakao_login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/anonymous", post(auth::anonymous))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user)
                .patch(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .route("/users/@me/topics", get(users::my_topics))
        .route("/users/@me/comments", get(users::my_comments))
        .route("/users/@me/votes", get(users::my_votes))
        .route("/users/:user_id", get(users::get_user))
}

/// Topic, vote, and per-topic comment routes
fn topic_routes() -> Router<AppState> {
    Router::new()
        .route("/topics", get(topics::list_topics).post(topics::create_topic))
        .route("/topics/hot", get(topics::hot_topics))
        .route("/topics/:topic_id", get(topics::get_topic))
        .route("/topics/:topic_id/views", post(topics::record_view))
        .route("/topics/:topic_id/report", post(topics::report_topic))
        // Votes
        .route(
            "/topics/:topic_id/vote",
            get(votes::my_vote)
                .post(votes::cast_vote)
                .delete(votes::cancel_vote),
        )
        // Comments
        .route(
            "/topics/:topic_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route("/topics/:topic_id/comments/best", get(comments::best_comments))
}

/// Comment routes addressed by comment id
fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/:comment_id", delete(comments::delete_comment))
        .route("/comments/:comment_id/report", post(comments::report_comment))
        .route("/comments/:comment_id/reactions", post(reactions::react))
}

/// Notification routes
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(notifications::list_notifications)
                .delete(notifications::delete_all_notifications),
        )
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route(
            "/notifications/:notification_id",
            delete(notifications::delete_notification),
        )
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_read),
        )
}

/// Admin routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/topics/:topic_id", delete(admin::delete_topic))
        .route("/admin/topics/:topic_id/pin", put(admin::set_pinned))
        .route("/admin/comments/reported", get(admin::reported_comments))
        .route("/admin/comments/:comment_id", delete(admin::delete_comment))
        .route(
            "/admin/comments/:comment_id/restore",
            post(admin::restore_comment),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:user_id", delete(admin::delete_user))
        .route("/admin/users/:user_id/role", put(admin::set_role))
}

/// Upload routes
fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/uploads", post(uploads::upload_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes + UPLOAD_BODY_SLACK))
}
