//! Vote handlers

use axum::{extract::State, Json};
use politalk_service::dto::{CastVoteRequest, TopicResponse, VoteResponse};
use politalk_service::VoteService;

use crate::extractors::{ActingIdentity, SnowflakeId, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Cast the caller's vote
///
/// POST /topics/{topic_id}/vote
pub async fn cast_vote(
    State(state): State<AppState>,
    ActingIdentity(voter): ActingIdentity,
    SnowflakeId(topic_id): SnowflakeId,
    ValidatedJson(request): ValidatedJson<CastVoteRequest>,
) -> ApiResult<Json<TopicResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service.cast_vote(topic_id, &voter, request).await?;
    Ok(Json(response))
}

/// Withdraw the caller's vote
///
/// DELETE /topics/{topic_id}/vote
pub async fn cancel_vote(
    State(state): State<AppState>,
    ActingIdentity(voter): ActingIdentity,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<Json<TopicResponse>> {
    let service = VoteService::new(state.service_context());
    let response = service.cancel_vote(topic_id, &voter).await?;
    Ok(Json(response))
}

/// GET /topics/{topic_id}/vote
pub async fn my_vote(
    State(state): State<AppState>,
    ActingIdentity(voter): ActingIdentity,
    SnowflakeId(topic_id): SnowflakeId,
) -> ApiResult<Json<Option<VoteResponse>>> {
    let service = VoteService::new(state.service_context());
    let response = service.my_vote(topic_id, &voter).await?;
    Ok(Json(response))
}
