//! User handlers
//!
//! Profile management, account deletion and the caller's history.

use axum::{extract::State, Json};
use politalk_service::dto::{
    CurrentUserResponse, MyCommentResponse, TopicSummaryResponse, UpdateProfileRequest,
    UserResponse, VoteHistoryResponse,
};
use politalk_service::{UserService, VoteService};

use crate::extractors::{ActingIdentity, AuthUser, SnowflakeId, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get current user
///
/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Update current user
///
/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_current_user(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Delete current user together with their topics and comments
///
/// DELETE /users/@me
pub async fn delete_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete_current_user(auth.user_id).await?;
    Ok(NoContent)
}

/// Topics started by the caller
///
/// GET /users/@me/topics
pub async fn my_topics(
    State(state): State<AppState>,
    ActingIdentity(identity): ActingIdentity,
) -> ApiResult<Json<Vec<TopicSummaryResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.my_topics(&identity).await?;
    Ok(Json(response))
}

/// Comments written by the caller
///
/// GET /users/@me/comments
pub async fn my_comments(
    State(state): State<AppState>,
    ActingIdentity(identity): ActingIdentity,
) -> ApiResult<Json<Vec<MyCommentResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.my_comments(&identity).await?;
    Ok(Json(response))
}

/// Votes cast by the caller
///
/// GET /users/@me/votes
pub async fn my_votes(
    State(state): State<AppState>,
    ActingIdentity(identity): ActingIdentity,
) -> ApiResult<Json<Vec<VoteHistoryResponse>>> {
    let service = VoteService::new(state.service_context());
    let response = service.vote_history(&identity).await?;
    Ok(Json(response))
}

/// Get user by ID (public profile)
///
/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    SnowflakeId(user_id): SnowflakeId,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(Json(response))
}
