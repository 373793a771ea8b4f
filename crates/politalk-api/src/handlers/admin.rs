//! Admin handlers
//!
//! Every endpoint requires an access token of an admin account; the role is
//! checked against the stored user, not the token.

use axum::{extract::State, Json};
use politalk_service::dto::{
    CurrentUserResponse, ReportedCommentResponse, SetPinnedRequest, SetRoleRequest,
};
use politalk_service::ModerationService;

use crate::extractors::{ApiQuery, AuthUser, PageQuery, SnowflakeId, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// PUT /admin/topics/{topic_id}/pin
pub async fn set_pinned(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(topic_id): SnowflakeId,
    ValidatedJson(request): ValidatedJson<SetPinnedRequest>,
) -> ApiResult<NoContent> {
    let service = ModerationService::new(state.service_context());
    service.set_pinned(auth.user_id, topic_id, request).await?;
    Ok(NoContent)
}

/// DELETE /admin/topics/{topic_id}
pub async fn delete_topic(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = ModerationService::new(state.service_context());
    service.delete_topic(auth.user_id, topic_id).await?;
    Ok(NoContent)
}

/// GET /admin/comments/reported?page=
pub async fn reported_comments(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Vec<ReportedCommentResponse>>> {
    let service = ModerationService::new(state.service_context());
    let response = service.reported_comments(auth.user_id, query.page).await?;
    Ok(Json(response))
}

/// POST /admin/comments/{comment_id}/restore
pub async fn restore_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(comment_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = ModerationService::new(state.service_context());
    service.restore_comment(auth.user_id, comment_id).await?;
    Ok(NoContent)
}

/// DELETE /admin/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(comment_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = ModerationService::new(state.service_context());
    service.delete_comment(auth.user_id, comment_id).await?;
    Ok(NoContent)
}

/// GET /admin/users?page=
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Vec<CurrentUserResponse>>> {
    let service = ModerationService::new(state.service_context());
    let response = service.list_users(auth.user_id, query.page).await?;
    Ok(Json(response))
}

/// PUT /admin/users/{user_id}/role
pub async fn set_role(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(user_id): SnowflakeId,
    ValidatedJson(request): ValidatedJson<SetRoleRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.set_role(auth.user_id, user_id, request).await?;
    Ok(Json(response))
}

/// DELETE /admin/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    SnowflakeId(user_id): SnowflakeId,
) -> ApiResult<NoContent> {
    let service = ModerationService::new(state.service_context());
    service.delete_user(auth.user_id, user_id).await?;
    Ok(NoContent)
}
